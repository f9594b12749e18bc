use std::io::Write;

use clap::Parser;
use fontstitch::{Args, Error, Recipe};

fn main() -> Result<(), Error> {
    env_logger::builder()
        .format(|buf, record| {
            let ts = buf.timestamp_micros();
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{}: {style}{}{style:#}: {}",
                ts,
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    let mut recipe = Recipe::load(&args.recipe)?;
    if let Some(output) = args.output {
        recipe.output = output;
    }
    fontstitch::run(&recipe)
}
