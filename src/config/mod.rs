pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::scenario::OutputFormat;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-creational")]
#[command(about = "Builds requests and sends mail templates through builder and prototype patterns")]
pub struct CliConfig {
    #[arg(long, help = "Scenario TOML file; runs the built-in demo when omitted")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
