// src/bin/cli.rs
use barca_catalog::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run().map_err(|e| color_eyre::eyre::eyre!(e.to_string()))
}
