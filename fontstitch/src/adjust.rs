//! Stroke, anchor, and math-constant adjustments.

use fontedit::{outline, AnchorPoint, Font, GlyphName};
use indexmap::IndexSet;
use log::{debug, info, trace};

use crate::config::Adjustments;

/// Apply the configured adjustments in place.
pub fn apply_adjustments(font: &mut Font, big: &IndexSet<GlyphName>, adjust: &Adjustments) {
    info!("adjusting strokes");
    for name in big {
        let delta = weight_delta_for(name, adjust);
        let Some(glyph) = font.glyph_mut(name.as_str()) else {
            trace!("skip '{name}', not in the font");
            continue;
        };
        glyph.outline = outline::adjust_stroke_weight(&glyph.outline, delta);
    }

    for name in &adjust.squish.glyphs {
        let Some(glyph) = font.glyph_mut(name.as_str()) else {
            trace!("skip squish of '{name}', not in the font");
            continue;
        };
        glyph.outline = outline::squish_horizontal(&glyph.outline, adjust.squish.x_scale);
    }

    for wanted in &adjust.anchors {
        let Some(glyph) = font.glyph_mut(wanted.glyph.as_str()) else {
            trace!("skip anchor on '{}', not in the font", wanted.glyph);
            continue;
        };
        glyph.add_anchor(AnchorPoint {
            name: wanted.name.clone().into(),
            kind: wanted.kind,
            x: wanted.x,
            y: wanted.y,
        });
    }

    for (constant, value) in &adjust.math_constants {
        font.math.constants.set(*constant, *value);
    }

    for glyph in font.iter() {
        if !glyph.anchors.is_empty() {
            debug!("anchors on '{}': {:?}", glyph.name, glyph.anchors);
        }
    }
}

/// Variant-marked names get the steeper delta; exactly two deltas exist.
fn weight_delta_for(name: &GlyphName, adjust: &Adjustments) -> f64 {
    if !adjust.variant_marker.is_empty() && name.as_str().contains(&adjust.variant_marker) {
        adjust.variant_weight_delta
    } else {
        adjust.weight_delta
    }
}

#[cfg(test)]
mod tests {
    use fontedit::{mathtable::MathConstant, AnchorKind, GlyphName};
    use indexmap::IndexSet;
    use kurbo::Shape;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{apply_adjustments, weight_delta_for};
    use crate::config::{Adjustments, AnchorSpec};
    use crate::testutil::test_font;

    fn big(names: &[&str]) -> IndexSet<GlyphName> {
        names.iter().copied().map(GlyphName::from).collect()
    }

    #[rstest]
    #[case::variant("summation.v1", -15.0)]
    #[case::marker_mid_name("xv1x", -15.0)]
    #[case::plain("summation", -10.0)]
    #[case::partial_marker("v", -10.0)]
    fn marker_selects_the_delta(#[case] name: &str, #[case] expected: f64) {
        let adjust = Adjustments::default();
        assert_eq!(expected, weight_delta_for(&name.into(), &adjust));
    }

    #[test]
    fn weight_change_thins_big_glyphs_only() {
        let mut font = test_font(&["integral", "plus"]);
        let before = font.glyph("plus").unwrap().outline.clone();
        apply_adjustments(&mut font, &big(&["integral"]), &Adjustments::default());

        let thinned = font.glyph("integral").unwrap().outline.bounding_box();
        // each boundary moved in by 5 units
        assert_eq!(105.0, thinned.min_x());
        assert_eq!(695.0, thinned.max_y());
        assert_eq!(before, font.glyph("plus").unwrap().outline);
    }

    #[test]
    fn weight_change_leaves_advances_alone() {
        let mut font = test_font(&["integral"]);
        let advance = font.glyph("integral").unwrap().advance;
        apply_adjustments(&mut font, &big(&["integral"]), &Adjustments::default());
        assert_eq!(advance, font.glyph("integral").unwrap().advance);
    }

    #[test]
    fn absent_big_names_are_skipped() {
        let mut font = test_font(&["integral"]);
        // must not panic
        apply_adjustments(
            &mut font,
            &big(&["integral", "radical"]),
            &Adjustments::default(),
        );
    }

    #[test]
    fn squish_narrows_the_configured_glyphs() {
        let mut font = test_font(&["product.v1"]);
        let before = font.glyph("product.v1").unwrap().outline.bounding_box();
        let adjust = Adjustments {
            squish: crate::config::Squish {
                glyphs: vec!["product.v1".into()],
                x_scale: 0.7,
            },
            ..Default::default()
        };
        apply_adjustments(&mut font, &IndexSet::new(), &adjust);
        let after = font.glyph("product.v1").unwrap().outline.bounding_box();
        assert!((after.width() - before.width() * 0.7).abs() < 1e-9);
        assert_eq!(before.height(), after.height());
    }

    #[test]
    fn anchors_and_constants_land() {
        let mut font = test_font(&["f"]);
        let adjust = Adjustments {
            anchors: vec![AnchorSpec {
                glyph: "f".into(),
                name: String::new(),
                kind: AnchorKind::BaseMark,
                x: 0.0,
                y: 0.0,
            }],
            math_constants: [
                (MathConstant::SubscriptTopMax, 300),
                (MathConstant::SuperscriptBottomMin, 300),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        apply_adjustments(&mut font, &IndexSet::new(), &adjust);

        let f = font.glyph("f").unwrap();
        assert_eq!(1, f.anchors.len());
        assert_eq!(AnchorKind::BaseMark, f.anchors[0].kind);
        assert_eq!(300, font.math.constants.get(MathConstant::SubscriptTopMax));
        assert_eq!(
            300,
            font.math.constants.get(MathConstant::SuperscriptBottomMin)
        );
    }
}
