//! advisorboard CLI: publishes advisor counts into the leaderboard page.
//!
//! Reads `datos.csv`, renders the advisors as a JavaScript array and
//! rewrites that array inside `copa_domiciliacion_embebido.html`.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
