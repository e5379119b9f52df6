#![allow(clippy::print_stdout, clippy::print_stderr)]

mod args;
mod command;
mod console;

use crate::args::{Cli, FlowArg};
use anyhow::Context;
use campus::Platform;
use campus::admissions::{RegistrarAssisted, SelfService};
use campus::domain::config::{ClientConfig, LoggingConfig};
use campus::kernel::config::load_config;
use campus_logger::Logger;
use clap::Parser;

#[campus_runtime::main(memory_efficient)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config: ClientConfig =
        load_config(cli.config.as_ref()).context("Critical: Configuration is malformed")?;
    let _log = init_logging(&config.logging)?;

    let platform = Platform::open(config).await.context("Failed to open the platform")?;

    match cli.flow {
        FlowArg::Applicant => console::run(platform.wizard::<SelfService>().await?).await,
        FlowArg::Registrar => console::run(platform.wizard::<RegistrarAssisted>().await?).await,
    }
}

/// Console logging interleaves with the prompt, so a configured directory switches it off.
fn init_logging(config: &LoggingConfig) -> anyhow::Result<Logger> {
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level_name(&config.level)?;
    let logger = match &config.directory {
        Some(directory) => builder.console(false).path(directory).json(config.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
