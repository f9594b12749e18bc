//! Shared helpers for building little fonts in tests.

use fontedit::{
    mathtable::{AssemblyPart, GlyphConstruction, GlyphVariant},
    Font, Glyph,
};
use kurbo::BezPath;

/// A glyph whose outline is a 100x700 bar at x=100, like a fat stem.
pub(crate) fn rect_glyph(name: &str) -> Glyph {
    let mut glyph = Glyph::new(name);
    glyph.advance = 300;
    glyph.outline = BezPath::from_svg("M100,0 L200,0 L200,700 L100,700 Z").unwrap();
    glyph
}

/// A font holding a bar glyph per name.
pub(crate) fn test_font(names: &[&str]) -> Font {
    let mut font = Font::new(1000);
    font.metrics.ascender = 800;
    font.metrics.descender = -200;
    for name in names {
        font.insert(rect_glyph(name));
    }
    font
}

/// A vertical construction from variant names and assembly part names.
pub(crate) fn construction(variants: &[&str], parts: &[&str]) -> GlyphConstruction {
    GlyphConstruction {
        variants: variants
            .iter()
            .map(|name| GlyphVariant {
                glyph: (*name).into(),
                advance: 1000,
            })
            .collect(),
        assembly: parts
            .iter()
            .map(|name| AssemblyPart {
                glyph: (*name).into(),
                start_connector: 50,
                end_connector: 50,
                full_advance: 400,
                extender: false,
            })
            .collect(),
    }
}
