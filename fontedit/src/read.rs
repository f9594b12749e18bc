//! Load a binary font into the editable model.

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::Path,
};

use log::debug;
use skrifa::{
    outline::DrawSettings,
    prelude::{LocationRef, Size},
    MetadataProvider,
};
use write_fonts::read::{
    tables::math::Math,
    types::{GlyphId, GlyphId16, Tag},
    FontRead, FontRef, TableProvider,
};

use crate::{
    error::Error,
    font::{Font, Glyph, VerticalMetrics},
    mathtable::MathTable,
    pens::BezPathPen,
    types::GlyphName,
};

/// Open a font file.
pub fn load(path: &Path) -> Result<Font, Error> {
    debug!("load {path:?}");
    let bytes = fs::read(path).map_err(|source| Error::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    from_bytes(&bytes)
}

/// Build the editable model from font bytes.
pub fn from_bytes(data: &[u8]) -> Result<Font, Error> {
    let font = FontRef::new(data)?;
    let head = font.head()?;
    let num_glyphs = font.maxp()?.num_glyphs();
    let hmtx = font.hmtx()?;
    let post = font.post().ok();

    let mut model = Font::new(head.units_per_em());
    if let Ok(hhea) = font.hhea() {
        model.metrics = VerticalMetrics {
            ascender: hhea.ascender().to_i16(),
            descender: hhea.descender().to_i16(),
            line_gap: hhea.line_gap().to_i16(),
        };
    }

    let mut codepoints: HashMap<u32, BTreeSet<u32>> = HashMap::new();
    for (codepoint, gid) in font.charmap().mappings() {
        codepoints.entry(gid.to_u32()).or_default().insert(codepoint);
    }

    let outlines = font.outline_glyphs();
    let mut order: Vec<GlyphName> = Vec::with_capacity(num_glyphs as usize);
    for gid in 0..num_glyphs {
        let glyph_id = GlyphId::new(gid as u32);
        let mut name = post
            .as_ref()
            .and_then(|post| post.glyph_name(GlyphId16::new(gid)))
            .map(GlyphName::new)
            .unwrap_or_else(|| synthesize_name(glyph_id, &codepoints));
        if model.contains(name.as_str()) {
            debug!("duplicate glyph name '{name}', synthesizing one from the id");
            name = GlyphName::new(format!("glyph.{:05}", glyph_id.to_u32()));
        }
        order.push(name.clone());

        let mut glyph = Glyph::new(name);
        glyph.advance = hmtx.advance(glyph_id).unwrap_or_default();
        if let Some(cps) = codepoints.get(&glyph_id.to_u32()) {
            glyph.codepoints = cps.clone();
        }
        if let Some(outline) = outlines.get(glyph_id) {
            let mut pen = BezPathPen::new();
            outline
                .draw(
                    DrawSettings::unhinted(Size::unscaled(), LocationRef::default()),
                    &mut pen,
                )
                .map_err(|source| Error::DrawError {
                    glyph_name: glyph.name.clone(),
                    source,
                })?;
            glyph.outline = pen.into_inner();
        }
        model.insert(glyph);
    }

    if let Some(math_data) = font.table_data(Tag::new(b"MATH")) {
        let math = Math::read(math_data)?;
        let name_of =
            |gid: GlyphId16| -> Option<GlyphName> { order.get(gid.to_u16() as usize).cloned() };
        model.math = MathTable::from_font(&math, &name_of)?;
    }
    if let Some(os2) = font.table_data(Tag::new(b"OS/2")) {
        model.os2 = Some(os2.as_bytes().to_vec());
    }

    Ok(model)
}

/// A readable name for a glyph the post table does not cover.
fn synthesize_name(gid: GlyphId, codepoints: &HashMap<u32, BTreeSet<u32>>) -> GlyphName {
    if gid == GlyphId::NOTDEF {
        return GlyphName::NOTDEF;
    }
    match codepoints.get(&gid.to_u32()).and_then(|cps| cps.first()) {
        Some(cp) if *cp <= 0xFFFF => GlyphName::new(format!("uni{cp:04X}")),
        Some(cp) => GlyphName::new(format!("u{cp:X}")),
        None => GlyphName::new(format!("glyph.{:05}", gid.to_u32())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use write_fonts::read::types::GlyphId;

    use super::synthesize_name;

    #[test]
    fn names_follow_codepoints_when_post_is_silent() {
        let codepoints: HashMap<u32, BTreeSet<u32>> = [
            (1u32, BTreeSet::from([0x222Bu32])),
            (2u32, BTreeSet::from([0x1D400u32])),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            synthesize_name(GlyphId::new(0), &codepoints),
            ".notdef".into()
        );
        assert_eq!(
            synthesize_name(GlyphId::new(1), &codepoints),
            "uni222B".into()
        );
        assert_eq!(
            synthesize_name(GlyphId::new(2), &codepoints),
            "u1D400".into()
        );
        assert_eq!(
            synthesize_name(GlyphId::new(3), &codepoints),
            "glyph.00003".into()
        );
    }
}
