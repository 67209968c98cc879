//! Fusion Storage Platform CLI (fusionctl)

use anyhow::Result;
use clap::Parser;
use fusion_cli::cli::{Cli, Commands};
use fusion_cli::commands::TeardownCommand;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let result = match &cli.command {
        Commands::Teardown { config } => {
            let cmd = TeardownCommand::new();
            cmd.execute(config.as_deref()).await
        }
    };

    match result {
        Ok(()) => {
            if !cli.quiet {
                log::info!("Command completed successfully");
            }
            std::process::exit(0);
        }
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);

                if cli.verbose || cli.debug {
                    for err in e.chain().skip(1) {
                        eprintln!("  Caused by: {}", err);
                    }
                }
            }
            std::process::exit(1);
        }
    }
}
