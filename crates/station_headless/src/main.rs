//! Galactic Station Manager - headless runner
//!
//! # Usage
//!
//! ```bash
//! # Autoplay ten minutes of game time in memory
//! cargo run -p station_headless -- run --seconds 600 --seed 7
//!
//! # Keep playing the game saved in a directory
//! cargo run -p station_headless -- run --seconds 600 --save-dir saves/
//!
//! # Show or wipe that save
//! cargo run -p station_headless -- summary --save-dir saves/
//! cargo run -p station_headless -- reset --save-dir saves/
//! ```
//!
//! Logs go to stderr and honour `RUST_LOG`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use station_headless::runner::{self, RunConfig};

#[derive(Parser)]
#[command(name = "station_headless")]
#[command(about = "Headless Galactic Station Manager runner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Autoplay with a scripted strategy and print the progress summary
    Run {
        /// Seconds of game time to play
        #[arg(long, default_value = "600")]
        seconds: u64,

        /// RNG seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Resume from and save to this directory
        #[arg(long)]
        save_dir: Option<PathBuf>,

        /// Station config (RON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strategy file (RON)
        #[arg(long)]
        strategy: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the progress summary of a saved game
    Summary {
        /// Save directory
        #[arg(long)]
        save_dir: PathBuf,
    },

    /// Delete a saved game
    Reset {
        /// Save directory
        #[arg(long)]
        save_dir: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            seconds,
            seed,
            save_dir,
            config,
            strategy,
            json,
        } => {
            let config = RunConfig {
                seconds,
                seed,
                save_dir,
                config_path: config,
                strategy_path: strategy,
            };
            runner::run(&config).map(|report| {
                if json {
                    match serde_json::to_string_pretty(&report) {
                        Ok(text) => println!("{text}"),
                        Err(e) => tracing::error!("Failed to encode report: {e}"),
                    }
                } else {
                    println!("{}", report.summary);
                }
            })
        }
        Commands::Summary { save_dir } => {
            runner::saved_summary(&save_dir).map(|summary| match summary {
                Some(summary) => println!("{summary}"),
                None => println!("No saved game in {}", save_dir.display()),
            })
        }
        Commands::Reset { save_dir } => runner::reset_save(&save_dir),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
