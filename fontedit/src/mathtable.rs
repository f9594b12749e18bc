//! The math-layout model: constants, variants, and assemblies.
//!
//! The MATH table is carried through a build mostly intact: the constants
//! block is kept verbatim (with typed access to individual values) and the
//! per-glyph variant data is lifted to glyph *names* so it survives the
//! merge reshuffling every glyph id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use write_fonts::read::{
    tables::math::{Math, MathVariants},
    types::GlyphId16,
    ReadError,
};

use crate::types::GlyphName;

/// Size of the fixed-layout MathConstants block.
const CONSTANTS_LEN: usize = 214;
/// Offset of the first MathValueRecord within the block.
const FIRST_VALUE_RECORD: usize = 8;
/// Number of MathValueRecords in the block.
const VALUE_RECORD_COUNT: usize = 51;

/// A value in the MathConstants block.
///
/// Variants are declared in table order; the byte offset of each one is
/// derived from its position.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum MathConstant {
    ScriptPercentScaleDown,
    ScriptScriptPercentScaleDown,
    DelimitedSubFormulaMinHeight,
    DisplayOperatorMinHeight,
    MathLeading,
    AxisHeight,
    AccentBaseHeight,
    FlattenedAccentBaseHeight,
    SubscriptShiftDown,
    SubscriptTopMax,
    SubscriptBaselineDropMin,
    SuperscriptShiftUp,
    SuperscriptShiftUpCramped,
    SuperscriptBottomMin,
    SuperscriptBaselineDropMax,
    SubSuperscriptGapMin,
    SuperscriptBottomMaxWithSubscript,
    SpaceAfterScript,
    UpperLimitGapMin,
    UpperLimitBaselineRiseMin,
    LowerLimitGapMin,
    LowerLimitBaselineDropMin,
    StackTopShiftUp,
    StackTopDisplayStyleShiftUp,
    StackBottomShiftDown,
    StackBottomDisplayStyleShiftDown,
    StackGapMin,
    StackDisplayStyleGapMin,
    StretchStackTopShiftUp,
    StretchStackBottomShiftDown,
    StretchStackGapAboveMin,
    StretchStackGapBelowMin,
    FractionNumeratorShiftUp,
    FractionNumeratorDisplayStyleShiftUp,
    FractionDenominatorShiftDown,
    FractionDenominatorDisplayStyleShiftDown,
    FractionNumeratorGapMin,
    FractionNumeratorDisplayStyleGapMin,
    FractionRuleThickness,
    FractionDenominatorGapMin,
    FractionDenominatorDisplayStyleGapMin,
    SkewedFractionHorizontalGap,
    SkewedFractionVerticalGap,
    OverbarVerticalGap,
    OverbarRuleThickness,
    OverbarExtraAscender,
    UnderbarVerticalGap,
    UnderbarRuleThickness,
    UnderbarExtraDescender,
    RadicalVerticalGap,
    RadicalDisplayStyleVerticalGap,
    RadicalRuleThickness,
    RadicalExtraAscender,
    RadicalKernBeforeDegree,
    RadicalKernAfterDegree,
    RadicalDegreeBottomRaisePercent,
}

impl MathConstant {
    fn byte_offset(self) -> usize {
        let ordinal = self as usize;
        match ordinal {
            // four plain words lead the block
            0..=3 => ordinal * 2,
            // then 51 MathValueRecords of (value, device offset)
            4..=54 => FIRST_VALUE_RECORD + 4 * (ordinal - 4),
            // RadicalDegreeBottomRaisePercent trails the records
            _ => 212,
        }
    }
}

/// The MathConstants block, kept as raw bytes with typed access.
///
/// Device-table offsets inside the block are cleared on construction; the
/// device corrections live outside the fixed-layout range this model keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantsBlock(Vec<u8>);

impl Default for ConstantsBlock {
    fn default() -> Self {
        ConstantsBlock(vec![0; CONSTANTS_LEN])
    }
}

impl ConstantsBlock {
    pub fn new() -> ConstantsBlock {
        Default::default()
    }

    pub(crate) fn from_raw(data: &[u8]) -> Option<ConstantsBlock> {
        if data.len() < CONSTANTS_LEN {
            return None;
        }
        let mut bytes = data[..CONSTANTS_LEN].to_vec();
        for record in 0..VALUE_RECORD_COUNT {
            let device_offset = FIRST_VALUE_RECORD + 4 * record + 2;
            bytes[device_offset] = 0;
            bytes[device_offset + 1] = 0;
        }
        Some(ConstantsBlock(bytes))
    }

    pub fn get(&self, constant: MathConstant) -> i16 {
        let at = constant.byte_offset();
        i16::from_be_bytes([self.0[at], self.0[at + 1]])
    }

    pub fn set(&mut self, constant: MathConstant, value: i16) {
        let at = constant.byte_offset();
        self.0[at..at + 2].copy_from_slice(&value.to_be_bytes());
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// One variant of a glyph at a different size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphVariant {
    pub glyph: GlyphName,
    /// Advance in the direction of extension, in design units.
    pub advance: u16,
}

/// One piece of a glyph assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyPart {
    pub glyph: GlyphName,
    pub start_connector: u16,
    pub end_connector: u16,
    pub full_advance: u16,
    /// Whether this part may repeat or be skipped.
    pub extender: bool,
}

/// Growth data for one glyph: ready-made variants plus an assembly recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphConstruction {
    pub variants: Vec<GlyphVariant>,
    pub assembly: Vec<AssemblyPart>,
}

impl GlyphConstruction {
    /// Every glyph name this construction references.
    pub fn referenced_names(&self) -> impl Iterator<Item = &GlyphName> {
        self.variants
            .iter()
            .map(|variant| &variant.glyph)
            .chain(self.assembly.iter().map(|part| &part.glyph))
    }
}

/// The whole math model for a font.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MathTable {
    pub constants: ConstantsBlock,
    pub min_connector_overlap: u16,
    /// Vertically growing constructions, keyed by base glyph name.
    pub vertical: BTreeMap<GlyphName, GlyphConstruction>,
    /// Horizontally growing constructions, keyed by base glyph name.
    pub horizontal: BTreeMap<GlyphName, GlyphConstruction>,
}

impl MathTable {
    /// True when serializing would produce a table that says nothing.
    pub fn is_empty(&self) -> bool {
        self.constants.is_zero()
            && self.min_connector_overlap == 0
            && self.vertical.is_empty()
            && self.horizontal.is_empty()
    }

    /// Lift a parsed MATH table into the name-keyed model.
    pub(crate) fn from_font(
        math: &Math,
        name_of: &impl Fn(GlyphId16) -> Option<GlyphName>,
    ) -> Result<MathTable, ReadError> {
        let mut table = MathTable::default();
        let constants = math.math_constants()?;
        if let Some(block) = ConstantsBlock::from_raw(constants.offset_data().as_bytes()) {
            table.constants = block;
        }
        let variants = math.math_variants()?;
        table.min_connector_overlap = variants.min_connector_overlap();
        table.vertical = decode_constructions(&variants, Direction::Vertical, name_of)?;
        table.horizontal = decode_constructions(&variants, Direction::Horizontal, name_of)?;
        Ok(table)
    }

    /// Serialize, resolving names through the caller's glyph order.
    ///
    /// Constructions or variants naming glyphs that no longer exist are
    /// silently dropped, mirroring how every other query site treats absent
    /// glyphs.
    pub(crate) fn to_bytes(&self, gid_of: &impl Fn(&GlyphName) -> Option<u16>) -> Vec<u8> {
        let mut w = Writer::default();
        // header: version 1.0 and three subtable offsets
        w.u16(1);
        w.u16(0);
        let constants_at = 10;
        let glyph_info_at = constants_at + CONSTANTS_LEN;
        let variants_at = glyph_info_at + GLYPH_INFO_LEN;
        w.u16(constants_at as u16);
        w.u16(glyph_info_at as u16);
        w.u16(variants_at as u16);
        w.bytes(self.constants.as_bytes());
        write_empty_glyph_info(&mut w);
        write_variants(&mut w, self, gid_of);
        w.finish()
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Vertical,
    Horizontal,
}

fn decode_constructions(
    variants: &MathVariants,
    direction: Direction,
    name_of: &impl Fn(GlyphId16) -> Option<GlyphName>,
) -> Result<BTreeMap<GlyphName, GlyphConstruction>, ReadError> {
    let coverage = match direction {
        Direction::Vertical => variants.vert_glyph_coverage()?,
        Direction::Horizontal => variants.horiz_glyph_coverage()?,
    };
    let mut result = BTreeMap::new();
    for (nth, covered) in coverage.iter().enumerate() {
        let Some(base_name) = name_of(covered) else {
            continue;
        };
        let parsed = match direction {
            Direction::Vertical => variants.vert_glyph_construction().get(nth)?,
            Direction::Horizontal => variants.horiz_glyph_construction().get(nth)?,
        };
        let mut decoded = GlyphConstruction::default();
        for record in parsed.math_glyph_variant_records() {
            let Some(glyph) = name_of(record.glyph_id()) else {
                continue;
            };
            decoded.variants.push(GlyphVariant {
                glyph,
                advance: record.advance_measurement(),
            });
        }
        if let Some(assembly) = parsed.glyph_assembly() {
            let assembly = assembly?;
            for part in assembly.part_records() {
                let Some(glyph) = name_of(part.glyph_id()) else {
                    continue;
                };
                decoded.assembly.push(AssemblyPart {
                    glyph,
                    start_connector: part.start_connector_length(),
                    end_connector: part.end_connector_length(),
                    full_advance: part.full_advance(),
                    extender: part.part_flags().contains(
                        write_fonts::read::tables::math::GlyphPartFlags::EXTENDER_FLAG,
                    ),
                });
            }
        }
        result.insert(base_name, decoded);
    }
    Ok(result)
}

/// An empty-but-valid MathGlyphInfo: italics corrections, top accents, and
/// kerning all covering zero glyphs.
const GLYPH_INFO_LEN: usize = 32;

fn write_empty_glyph_info(w: &mut Writer) {
    // header: italics, top accent, extended shapes (null), kern info
    w.u16(8);
    w.u16(16);
    w.u16(0);
    w.u16(24);
    // three identical empty subtables: coverage offset 4, count 0,
    // then a format-1 coverage with no glyphs
    for _ in 0..3 {
        w.u16(4);
        w.u16(0);
        w.u16(1);
        w.u16(0);
    }
}

fn write_variants(w: &mut Writer, table: &MathTable, gid_of: &impl Fn(&GlyphName) -> Option<u16>) {
    let vertical = resolve_constructions(&table.vertical, gid_of);
    let horizontal = resolve_constructions(&table.horizontal, gid_of);

    let start = w.len();
    w.u16(table.min_connector_overlap);
    let vert_coverage_slot = w.reserve();
    let horiz_coverage_slot = w.reserve();
    w.u16(vertical.len() as u16);
    w.u16(horizontal.len() as u16);
    let vert_construction_slots: Vec<_> = vertical.iter().map(|_| w.reserve()).collect();
    let horiz_construction_slots: Vec<_> = horizontal.iter().map(|_| w.reserve()).collect();

    w.patch_u16(vert_coverage_slot, (w.len() - start) as u16);
    write_coverage(w, vertical.iter().map(|(gid, _)| *gid));
    w.patch_u16(horiz_coverage_slot, (w.len() - start) as u16);
    write_coverage(w, horizontal.iter().map(|(gid, _)| *gid));

    for (slot, (_, construction)) in vert_construction_slots
        .into_iter()
        .chain(horiz_construction_slots)
        .zip(vertical.iter().chain(horizontal.iter()))
    {
        w.patch_u16(slot, (w.len() - start) as u16);
        write_construction(w, construction, gid_of);
    }
}

/// Pair constructions with resolved glyph ids, sorted the way coverage
/// tables must be.
fn resolve_constructions<'a>(
    constructions: &'a BTreeMap<GlyphName, GlyphConstruction>,
    gid_of: &impl Fn(&GlyphName) -> Option<u16>,
) -> Vec<(u16, &'a GlyphConstruction)> {
    let mut resolved: Vec<_> = constructions
        .iter()
        .filter_map(|(name, construction)| gid_of(name).map(|gid| (gid, construction)))
        .collect();
    resolved.sort_by_key(|(gid, _)| *gid);
    resolved
}

fn write_coverage(w: &mut Writer, glyphs: impl ExactSizeIterator<Item = u16>) {
    w.u16(1);
    w.u16(glyphs.len() as u16);
    for gid in glyphs {
        w.u16(gid);
    }
}

fn write_construction(
    w: &mut Writer,
    construction: &GlyphConstruction,
    gid_of: &impl Fn(&GlyphName) -> Option<u16>,
) {
    let variants: Vec<_> = construction
        .variants
        .iter()
        .filter_map(|variant| gid_of(&variant.glyph).map(|gid| (gid, variant.advance)))
        .collect();
    let parts: Vec<_> = construction
        .assembly
        .iter()
        .map(|part| gid_of(&part.glyph).map(|gid| (gid, part)))
        .collect::<Option<Vec<_>>>()
        // a partial assembly would be corrupt, drop the whole thing
        .unwrap_or_default();

    let assembly_offset = if parts.is_empty() {
        0
    } else {
        4 + 4 * variants.len() as u16
    };
    w.u16(assembly_offset);
    w.u16(variants.len() as u16);
    for (gid, advance) in variants {
        w.u16(gid);
        w.u16(advance);
    }
    if !parts.is_empty() {
        // italic correction for the assembly: zero value, no device table
        w.u16(0);
        w.u16(0);
        w.u16(parts.len() as u16);
        for (gid, part) in parts {
            w.u16(gid);
            w.u16(part.start_connector);
            w.u16(part.end_connector);
            w.u16(part.full_advance);
            w.u16(part.extender as u16);
        }
    }
}

/// Big-endian table assembly with offset backpatching.
#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a placeholder u16 and return its position for [Self::patch_u16].
    fn reserve(&mut self) -> usize {
        let at = self.buf.len();
        self.u16(0);
        at
    }

    fn patch_u16(&mut self, at: usize, value: u16) {
        self.buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
    }

    fn len(&self) -> usize {
        self.buf.len()
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}
