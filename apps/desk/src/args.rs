use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "campus-desk")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Console front desk for student registration")]
pub struct Cli {
    /// Which registration wizard to run
    #[arg(long, value_enum, default_value_t = FlowArg::Applicant)]
    pub flow: FlowArg,

    /// Configuration file (without extension); `campus.*` in the working directory otherwise
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlowArg {
    /// Applicant self-registration, four steps
    Applicant,
    /// Registrar-entered student with account and enrollment, five steps
    Registrar,
}
