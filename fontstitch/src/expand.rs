//! Expansion of the display-glyph seed set.
//!
//! Seeds like `integral` pull in every glyph their math construction
//! references: the ready-made larger variants and the assembly pieces a
//! stretched version is built from.

use fontedit::{Font, GlyphName};
use indexmap::IndexSet;
use log::trace;

use crate::config::Expansion;

/// Grow the seed list into the full set of display-sized glyph names.
///
/// Seeds stay in the set whether or not the font knows them; downstream
/// consumers only ever test membership and skip what is absent.
pub fn expand_big_glyphs(
    font: &Font,
    seeds: &[GlyphName],
    mode: Expansion,
) -> IndexSet<GlyphName> {
    let mut big: IndexSet<GlyphName> = seeds.iter().cloned().collect();
    match mode {
        Expansion::SeedsOnly => {
            for seed in seeds {
                for name in references(font, seed) {
                    big.insert(name);
                }
            }
        }
        Expansion::Transitive => {
            let mut pending: Vec<GlyphName> = seeds.to_vec();
            while let Some(next) = pending.pop() {
                for name in references(font, &next) {
                    if big.insert(name.clone()) {
                        pending.push(name);
                    }
                }
            }
        }
    }
    trace!("big glyphs: {big:?}");
    big
}

/// The names a glyph's vertical construction points at, or nothing when the
/// glyph (or its construction) is absent.
fn references(font: &Font, name: &GlyphName) -> Vec<GlyphName> {
    if !font.contains(name.as_str()) {
        return Vec::new();
    }
    font.math
        .vertical
        .get(name)
        .map(|construction| construction.referenced_names().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use fontedit::GlyphName;
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;

    use super::expand_big_glyphs;
    use crate::config::Expansion;
    use crate::testutil::{construction, test_font};

    fn names(names: &[&str]) -> IndexSet<GlyphName> {
        names.iter().copied().map(GlyphName::from).collect()
    }

    #[test]
    fn variants_and_parts_join_the_set() {
        let mut font = test_font(&["integral", "integral.v1", "integral.v2", "integral.ext"]);
        font.math.vertical.insert(
            "integral".into(),
            construction(&["integral.v1", "integral.v2"], &["integral.ext"]),
        );

        let big = expand_big_glyphs(&font, &["integral".into()], Expansion::SeedsOnly);
        assert_eq!(
            names(&["integral", "integral.v1", "integral.v2", "integral.ext"]),
            big
        );
    }

    #[test]
    fn absent_seeds_expand_to_nothing_but_stay() {
        let font = test_font(&["parenleft"]);
        let big = expand_big_glyphs(&font, &["summation".into()], Expansion::SeedsOnly);
        assert_eq!(names(&["summation"]), big);
    }

    #[test]
    fn seeds_only_ignores_appended_names() {
        let mut font = test_font(&["integral", "integral.v1", "integral.v2"]);
        font.math
            .vertical
            .insert("integral".into(), construction(&["integral.v1"], &[]));
        font.math
            .vertical
            .insert("integral.v1".into(), construction(&["integral.v2"], &[]));

        let big = expand_big_glyphs(&font, &["integral".into()], Expansion::SeedsOnly);
        assert_eq!(names(&["integral", "integral.v1"]), big);
    }

    #[test]
    fn transitive_chases_appended_names() {
        let mut font = test_font(&["integral", "integral.v1", "integral.v2"]);
        font.math
            .vertical
            .insert("integral".into(), construction(&["integral.v1"], &[]));
        font.math
            .vertical
            .insert("integral.v1".into(), construction(&["integral.v2"], &[]));

        let big = expand_big_glyphs(&font, &["integral".into()], Expansion::Transitive);
        assert_eq!(names(&["integral", "integral.v1", "integral.v2"]), big);
    }

    #[test]
    fn transitive_tolerates_cycles() {
        let mut font = test_font(&["a", "b"]);
        font.math
            .vertical
            .insert("a".into(), construction(&["b"], &[]));
        font.math
            .vertical
            .insert("b".into(), construction(&["a"], &[]));
        let big = expand_big_glyphs(&font, &["a".into()], Expansion::Transitive);
        assert_eq!(names(&["a", "b"]), big);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let mut font = test_font(&["integral", "integral.v1"]);
        // the variant list and the assembly both name integral.v1
        font.math.vertical.insert(
            "integral".into(),
            construction(&["integral.v1"], &["integral.v1"]),
        );
        let big = expand_big_glyphs(&font, &["integral".into()], Expansion::SeedsOnly);
        assert_eq!(names(&["integral", "integral.v1"]), big);
    }
}
