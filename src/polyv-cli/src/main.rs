mod cli;
mod commands;
mod prompt;
mod run_log;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Filter(args) => commands::filter::handle(&args)?,
        Commands::Fuse(args) => commands::fuse::handle(&args)?,
        Commands::Retag(args) => commands::retag::handle(&args)?,
        Commands::StripEffect(args) => commands::strip::handle(&args)?,
        Commands::SwapVoice(args) => commands::swap::handle(&args)?,
    }

    Ok(())
}
