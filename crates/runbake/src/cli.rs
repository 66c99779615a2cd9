use std::path::PathBuf;

use clap::Parser;
use runbake_build::ConfigOverrides;

use crate::logging::LogLevel;

#[derive(Clone, Debug, Parser)]
#[command(name = "runbake", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Application entry script
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Path of the executable to produce
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Runtime version to build, `latest` or e.g. `4.2.1`
    #[arg(short = 'r', long = "runtime")]
    pub runtime: Option<String>,

    /// Cache directory for runtime sources
    #[arg(short = 't', long = "temp")]
    pub temp: Option<PathBuf>,

    /// Pass every command line flag through to the application
    #[arg(short = 'f', long = "flags")]
    pub flags: bool,

    /// Configuration file (default: runbake.toml if present)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the runtime source distribution
    #[arg(long)]
    pub dist_url: Option<String>,

    /// Expected SHA-256 of the source archive
    #[arg(long)]
    pub checksum: Option<String>,

    /// Log verbosity, overridden by RUNBAKE_LOG
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            entry: self.input.clone(),
            output: self.output.clone(),
            runtime_version: self.runtime.clone(),
            cache_dir: self.temp.clone(),
            suppress_cli_flags: self.flags.then_some(true),
            dist_url: self.dist_url.clone(),
            checksum: self.checksum.clone(),
        }
    }
}
