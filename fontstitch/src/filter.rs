//! Glyph retention and removal policies.
//!
//! Filtering always runs before merging, so the merge never sees the names
//! the filter deleted.

use fontedit::{Font, GlyphName};
use indexmap::IndexSet;
use log::{debug, info};

use crate::config::FilterPolicy;

/// Apply the configured policy to the base font. Returns how many glyphs
/// were removed, for the diagnostic summary.
pub fn apply_filter(
    base: &mut Font,
    merge_fonts: &[Font],
    policy: &FilterPolicy,
    big: &IndexSet<GlyphName>,
) -> usize {
    info!("cleaning up");
    let removed = match policy {
        FilterPolicy::ExcludeDuplicates { reserved_prefixes } => {
            exclude_duplicates(base, merge_fonts, reserved_prefixes)
        }
        FilterPolicy::RetainListed { keep } => retain_listed(base, keep, big),
    };
    info!("removed {removed} glyphs");
    removed
}

fn exclude_duplicates(base: &mut Font, merge_fonts: &[Font], prefixes: &[String]) -> usize {
    let mut removed = 0;
    for other in merge_fonts {
        for name in other.glyph_names() {
            if base.remove_glyph(name.as_str()).is_some() {
                debug!("drop '{name}', an incoming merge supplies it");
                removed += 1;
            }
        }
    }
    let reserved: Vec<GlyphName> = base
        .iter()
        .map(|glyph| glyph.name.clone())
        .filter(|name| prefixes.iter().any(|prefix| name.as_str().starts_with(prefix)))
        .collect();
    for name in reserved {
        debug!("drop '{name}', reserved name range");
        base.remove_glyph(name.as_str());
        removed += 1;
    }
    removed
}

fn retain_listed(base: &mut Font, keep: &[GlyphName], big: &IndexSet<GlyphName>) -> usize {
    let retained: IndexSet<&GlyphName> = keep.iter().chain(big.iter()).collect();
    let before = base.len();
    base.retain(|name| retained.contains(name));
    before - base.len()
}
