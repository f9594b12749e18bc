use std::{io, path::PathBuf};

use thiserror::Error;
use write_fonts::{read::ReadError, tables::cmap::CmapConflict, tables::glyf::MalformedPath};

use crate::types::GlyphName;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io failed for {path:?}: '{source}'")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse font: '{0}'")]
    ParseError(#[from] ReadError),
    #[error("unable to draw '{glyph_name}': '{source}'")]
    DrawError {
        glyph_name: GlyphName,
        #[source]
        source: skrifa::outline::DrawError,
    },
    #[error("'{glyph_name}' {kurbo_problem:?} {context}")]
    KurboError {
        glyph_name: GlyphName,
        kurbo_problem: MalformedPath,
        context: String,
    },
    #[error("'{0}' has cubic segments no quadratic spline approximates")]
    QuadConversion(GlyphName),
    #[error("generating bytes for {context} failed: '{source}'")]
    DumpTableError {
        context: String,
        #[source]
        source: write_fonts::error::Error,
    },
    #[error("failed to build table: '{0}'")]
    BuildTable(#[from] write_fonts::BuilderError),
    #[error(transparent)]
    CmapConflict(#[from] CmapConflict),
}
