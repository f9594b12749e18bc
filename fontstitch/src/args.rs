//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

/// What font shall we stitch together today?
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// A YAML recipe naming the fonts to combine and the adjustments to apply
    #[arg(short, long)]
    pub recipe: PathBuf,

    /// Write the result here instead of the recipe's output path
    #[arg(short, long)]
    #[clap(default_value = None)]
    pub output: Option<PathBuf>,
}
