//! An editable in-memory font model.
//!
//! A [`Font`] is an ordered map of named glyphs plus the font-wide metadata
//! a composite-font build needs to carry: vertical metrics, name-table
//! identity, and math-layout data. Load one with [`read::load`], mutate it,
//! and serialize it exactly once with [`Font::save`].

pub mod error;
pub mod font;
pub mod mathtable;
pub mod outline;
pub mod pens;
pub mod read;
pub mod types;
pub mod write;

pub use error::Error;
pub use font::{AnchorKind, AnchorPoint, Font, Glyph};
pub use types::GlyphName;
