//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fusionctl")]
#[command(about = "Fusion Storage Platform CLI")]
#[command(version, disable_version_flag = true)]
#[command(long_about = "
Fusion Storage Platform CLI

Examples:
  fusionctl teardown                       # Tear down all workloads
  fusionctl teardown -c ./fusion.toml      # Use a specific configuration file
  fusionctl -V teardown                    # Verbose progress output
")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete all workloads (volumes, snapshots, placement groups, tenant
    /// spaces, host access policies) in dependency order
    Teardown {
        /// Configuration file with API endpoint and credentials
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Default log level derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
