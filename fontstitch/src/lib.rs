//! fontstitch stitches glyphs from several fonts into one composite math
//! font.
//!
//! A run is a single sequential pass driven by a [`Recipe`]: load the base
//! and merge fonts, expand the display-glyph seed set through the base
//! font's math constructions, filter the base glyph set, merge, adjust
//! strokes and math constants, and write the result exactly once.

mod adjust;
pub mod args;
pub mod config;
pub mod error;
mod expand;
mod filter;
#[cfg(test)]
pub(crate) mod testutil;

use fontedit::Font;
use log::info;

pub use args::Args;
pub use config::Recipe;
pub use error::Error;

/// Run every stage and write the output font.
pub fn run(recipe: &Recipe) -> Result<(), Error> {
    let font = stitch(recipe)?;
    info!("writing result");
    font.save(&recipe.output)?;
    Ok(())
}

/// Run every stage short of writing the output file.
pub fn stitch(recipe: &Recipe) -> Result<Font, Error> {
    let mut base = fontedit::read::load(&recipe.base)?;
    let merge_fonts = recipe
        .merge
        .iter()
        .map(|path| fontedit::read::load(path))
        .collect::<Result<Vec<_>, _>>()?;

    let big = expand::expand_big_glyphs(&base, &recipe.big_glyphs.seeds, recipe.big_glyphs.expansion);
    filter::apply_filter(&mut base, &merge_fonts, &recipe.filter, &big);

    info!("merging");
    for other in merge_fonts {
        base.merge(other);
    }

    adjust::apply_adjustments(&mut base, &big, &recipe.adjust);

    base.names = recipe.names.clone().into();
    Ok(base)
}
