//! The editable font: an ordered glyph map plus font-wide metadata.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use kurbo::BezPath;
use log::warn;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::{mathtable::MathTable, types::GlyphName};

/// Vertical metrics carried through from the source font.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VerticalMetrics {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

/// Name-table identity for the output font.
///
/// Only the entries a composite build overwrites; unset fields are simply
/// not written.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Naming {
    pub family: Option<String>,
    pub postscript_name: Option<String>,
    pub full_name: Option<String>,
    pub preferred_family: Option<String>,
}

/// What a mark-attachment anchor attaches.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorKind {
    Base,
    Mark,
    BaseMark,
}

/// A named attachment coordinate on a glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    pub name: SmolStr,
    pub kind: AnchorKind,
    pub x: f64,
    pub y: f64,
}

/// A single glyph: outline, advance, and the metadata that rides along.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Glyph {
    pub name: GlyphName,
    /// Advance width in font units.
    pub advance: u16,
    /// Unicode values mapping to this glyph.
    pub codepoints: BTreeSet<u32>,
    pub outline: BezPath,
    pub anchors: Vec<AnchorPoint>,
}

impl Glyph {
    pub fn new(name: impl Into<GlyphName>) -> Glyph {
        Glyph {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_anchor(&mut self, anchor: AnchorPoint) {
        self.anchors.push(anchor);
    }
}

/// An exclusively-owned, in-memory font.
///
/// Glyphs keep their insertion order; that order becomes glyph-id order when
/// the font is serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Font {
    pub units_per_em: u16,
    pub metrics: VerticalMetrics,
    pub names: Naming,
    pub math: MathTable,
    /// OS/2 bytes carried through verbatim from the source font, if any.
    pub(crate) os2: Option<Vec<u8>>,
    glyphs: IndexMap<GlyphName, Glyph>,
}

impl Font {
    pub fn new(units_per_em: u16) -> Font {
        Font {
            units_per_em,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    pub fn glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    pub fn glyph_mut(&mut self, name: &str) -> Option<&mut Glyph> {
        self.glyphs.get_mut(name)
    }

    /// Add a glyph, replacing any existing glyph of the same name.
    pub fn insert(&mut self, glyph: Glyph) {
        self.glyphs.insert(glyph.name.clone(), glyph);
    }

    /// Remove a glyph, preserving the order of the remaining glyphs.
    pub fn remove_glyph(&mut self, name: &str) -> Option<Glyph> {
        self.glyphs.shift_remove(name)
    }

    /// Drop every glyph the predicate rejects.
    pub fn retain(&mut self, mut keep: impl FnMut(&GlyphName) -> bool) {
        self.glyphs.retain(|name, _| keep(name));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }

    pub fn glyph_names(&self) -> Vec<GlyphName> {
        self.glyphs.keys().cloned().collect()
    }

    /// Union another font's glyphs (and math constructions) into this one.
    ///
    /// The caller is expected to have removed duplicates beforehand; a name
    /// that is still present in both fonts keeps the glyph already here.
    pub fn merge(&mut self, other: Font) {
        if other.units_per_em != self.units_per_em {
            warn!(
                "merging a font with {} units per em into one with {}",
                other.units_per_em, self.units_per_em
            );
        }
        for (name, glyph) in other.glyphs {
            if self.glyphs.contains_key(&name) {
                warn!("'{name}' already present, keeping the existing glyph");
                continue;
            }
            self.glyphs.insert(name, glyph);
        }
        for (name, construction) in other.math.vertical {
            self.math.vertical.entry(name).or_insert(construction);
        }
        for (name, construction) in other.math.horizontal {
            self.math.horizontal.entry(name).or_insert(construction);
        }
        if self.math.min_connector_overlap == 0 {
            self.math.min_connector_overlap = other.math.min_connector_overlap;
        }
    }
}
