//! sp-demo CLI
//!
//! Enrolls a device with the mHealth platform and uploads a data file.

use clap::Parser;
use sp_cli_common::init_logging;

mod args;
mod run;
mod session;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_logging(args.log_level)?;

    let summary = run::execute(args).await?;
    run::report(&summary);

    Ok(())
}
