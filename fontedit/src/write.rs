//! Serialize the editable model to a binary font.

use std::{cmp::max, cmp::min, collections::HashMap, fs, path::Path};

use log::debug;
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::Hmtx,
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        post::Post,
        vmtx::LongMetric,
    },
    types::{FWord, GlyphId, NameId, Tag, UfWord},
    FontBuilder, OffsetMarker,
};

use crate::{
    error::Error,
    font::{Font, Glyph, Naming},
    outline::{to_quadratic, QUAD_ACCURACY},
    types::GlyphName,
};

const WINDOWS_PLATFORM: u16 = 3;
const UNICODE_BMP_ENCODING: u16 = 1;
const ENGLISH_US: u16 = 0x409;

impl Font {
    /// Serialize and write the font out, once, at the end of a run.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|source| Error::FileIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compile the model into a binary font.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        // glyph id order is insertion order, except .notdef must lead and is
        // synthesized when absent
        let synthesized_notdef = Glyph::new(GlyphName::NOTDEF);
        let mut order: Vec<&Glyph> = Vec::with_capacity(self.len() + 1);
        order.push(self.glyph(".notdef").unwrap_or(&synthesized_notdef));
        order.extend(self.iter().filter(|glyph| glyph.name != ".notdef"));
        let gid_of: HashMap<GlyphName, u16> = order
            .iter()
            .enumerate()
            .map(|(gid, glyph)| (glyph.name.clone(), gid as u16))
            .collect();

        let mut builder = GlyfLocaBuilder::new();
        let mut limits = FontLimits::default();
        let mut long_metrics = Vec::with_capacity(order.len());
        for glyph in &order {
            let simple = if glyph.outline.is_empty() {
                SimpleGlyph::default()
            } else {
                let quadratic = to_quadratic(&glyph.outline, QUAD_ACCURACY)
                    .ok_or_else(|| Error::QuadConversion(glyph.name.clone()))?;
                SimpleGlyph::from_bezpath(&quadratic).map_err(|kurbo_problem| {
                    Error::KurboError {
                        glyph_name: glyph.name.clone(),
                        kurbo_problem,
                        context: quadratic.to_svg(),
                    }
                })?
            };
            limits.update(glyph.advance, &simple);
            long_metrics.push(LongMetric {
                advance: glyph.advance,
                side_bearing: simple.bbox.x_min,
            });
            builder
                .add_glyph(&simple)
                .map_err(|source| Error::DumpTableError {
                    context: format!("glyf glyph '{}'", glyph.name),
                    source,
                })?;
        }
        let (glyf, loca, loca_format) = builder.build();

        let head = Head {
            units_per_em: self.units_per_em,
            x_min: limits.x_min,
            y_min: limits.y_min,
            x_max: limits.x_max,
            y_max: limits.y_max,
            index_to_loc_format: match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            },
            ..Default::default()
        };

        let hhea = Hhea {
            ascender: FWord::new(self.metrics.ascender),
            descender: FWord::new(self.metrics.descender),
            line_gap: FWord::new(self.metrics.line_gap),
            advance_width_max: UfWord::new(limits.advance_width_max),
            min_left_side_bearing: FWord::new(limits.min_left_side_bearing.unwrap_or_default()),
            min_right_side_bearing: FWord::new(limits.min_right_side_bearing.unwrap_or_default()),
            x_max_extent: FWord::new(limits.x_max_extent.unwrap_or_default()),
            number_of_h_metrics: long_metrics.len() as u16,
            ..Default::default()
        };
        let hmtx = Hmtx::new(long_metrics, Vec::new());

        // maxp computes its version based on whether fields are set
        // if you fail to set any of them it gets angry with you so set all of them
        let maxp = Maxp {
            num_glyphs: order.len() as u16,
            max_points: Some(limits.max_points),
            max_contours: Some(limits.max_contours),
            max_composite_points: Some(0),
            max_composite_contours: Some(0),
            max_zones: Some(1),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(0),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(0),
            max_component_elements: Some(0),
            max_component_depth: Some(0),
        };

        let mappings = order.iter().enumerate().flat_map(|(gid, glyph)| {
            glyph
                .codepoints
                .iter()
                .filter_map(move |codepoint| char::from_u32(*codepoint))
                .map(move |ch| (ch, GlyphId::new(gid as u32)))
        });
        let cmap = Cmap::from_mappings(mappings)?;

        let post = Post::new_v2(order.iter().map(|glyph| glyph.name.as_str()));

        let mut font_builder = FontBuilder::default();
        font_builder.add_table(&head)?;
        font_builder.add_table(&hhea)?;
        font_builder.add_table(&hmtx)?;
        font_builder.add_table(&maxp)?;
        font_builder.add_table(&cmap)?;
        font_builder.add_table(&post)?;
        font_builder.add_table(&glyf)?;
        font_builder.add_table(&loca)?;
        if let Some(name) = build_name(&self.names) {
            font_builder.add_table(&name)?;
        }
        if !self.math.is_empty() {
            let math = self.math.to_bytes(&|name| gid_of.get(name).copied());
            font_builder.add_raw(Tag::new(b"MATH"), math);
        }
        if let Some(os2) = &self.os2 {
            font_builder.add_raw(Tag::new(b"OS/2"), os2.clone());
        }

        let bytes = font_builder.build();
        debug!("assembled {} byte font", bytes.len());
        Ok(bytes)
    }
}

fn build_name(naming: &Naming) -> Option<Name> {
    let entries = [
        (NameId::FAMILY_NAME, naming.family.as_ref()),
        (NameId::FULL_NAME, naming.full_name.as_ref()),
        (NameId::POSTSCRIPT_NAME, naming.postscript_name.as_ref()),
        (NameId::TYPOGRAPHIC_FAMILY_NAME, naming.preferred_family.as_ref()),
    ];
    let records: Vec<NameRecord> = entries
        .into_iter()
        .filter_map(|(name_id, value)| {
            value.map(|value| NameRecord {
                name_id,
                platform_id: WINDOWS_PLATFORM,
                encoding_id: UNICODE_BMP_ENCODING,
                language_id: ENGLISH_US,
                string: OffsetMarker::new(value.clone()),
            })
        })
        .collect();
    if records.is_empty() {
        return None;
    }
    Some(Name::new(records.into_iter().collect()))
}

/// Font-wide, or global, limits
#[derive(Debug, Default)]
struct FontLimits {
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    min_left_side_bearing: Option<i16>,
    min_right_side_bearing: Option<i16>,
    x_max_extent: Option<i16>,
    advance_width_max: u16,
    max_points: u16,
    max_contours: u16,
}

impl FontLimits {
    fn update(&mut self, advance: u16, glyph: &SimpleGlyph) {
        // min side bearings and the font bbox only consider non-empty glyphs
        if !glyph.contours.is_empty() {
            let bbox = glyph.bbox;
            let left_side_bearing = bbox.x_min;
            let right_side_bearing: i16 = match advance as i32 - bbox.x_max as i32 {
                value if value < i16::MIN as i32 => i16::MIN,
                value if value > i16::MAX as i32 => i16::MAX,
                value => value as i16,
            };
            self.min_left_side_bearing = Some(
                self.min_left_side_bearing
                    .map_or(left_side_bearing, |v| min(v, left_side_bearing)),
            );
            self.min_right_side_bearing = Some(
                self.min_right_side_bearing
                    .map_or(right_side_bearing, |v| min(v, right_side_bearing)),
            );
            self.x_max_extent = Some(self.x_max_extent.map_or(bbox.x_max, |v| max(v, bbox.x_max)));
            self.x_min = min(self.x_min, bbox.x_min);
            self.y_min = min(self.y_min, bbox.y_min);
            self.x_max = max(self.x_max, bbox.x_max);
            self.y_max = max(self.y_max, bbox.y_max);
        }
        self.advance_width_max = max(self.advance_width_max, advance);
        let num_points = glyph
            .contours
            .iter()
            .map(|contour| contour.len())
            .sum::<usize>() as u16;
        self.max_points = max(self.max_points, num_points);
        self.max_contours = max(self.max_contours, glyph.contours.len() as u16);
    }
}
