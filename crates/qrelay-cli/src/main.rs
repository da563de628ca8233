//! qrelay Command-Line Interface
//!
//! The main entry point for the qrelay CLI tool.
//!
//! ```text
//! source  ─────────────●──H──M──────────────────
//!                      │     ║ slot 0
//! ancilla ──H──●───────X─────╫──M───────────────
//!              │             ║  ║ slot 1
//! target  ─────X─────────────╫──╫──X^(s1)──Z^(s0)──
//!
//!                  Q R E L A Y
//!     Teleportation relays for distributed circuits
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::broadcast::Variant;
use commands::common::OutputFormat;
use commands::{broadcast, compare, guide, teleport, version};
use config::Config;

/// qrelay - teleportation relays for distributed quantum circuits
#[derive(Parser)]
#[command(name = "qrelay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(long, global = true, env = "QRELAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a direct CNOT against a teleportation relay
    Compare {
        /// Also list every instruction of both circuits
        #[arg(long)]
        instructions: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Relay an rx(theta)-prepared qubit and check the target
    Teleport {
        #[command(flatten)]
        run: RunArgs,

        /// Wire the correction slots the wrong way round
        #[arg(long)]
        swapped: bool,
    },

    /// Broadcast an rx(theta)-prepared qubit to three nodes
    Broadcast {
        #[command(flatten)]
        run: RunArgs,

        /// Broadcast topology
        #[arg(long, value_enum, default_value_t)]
        variant: Variant,
    },

    /// Show how to replace direct CNOTs with relays
    Guide,

    /// Show version information
    Version,
}

/// Options shared by the simulating subcommands.
#[derive(Args)]
struct RunArgs {
    /// Source preparation angle in radians
    #[arg(long, allow_negative_numbers = true)]
    theta: Option<f64>,

    /// Number of shots
    #[arg(short, long)]
    shots: Option<u32>,

    /// Simulator seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl RunArgs {
    fn resolve(&self, config_file: Option<&PathBuf>) -> anyhow::Result<Config> {
        let config = Config::load(config_file.map(PathBuf::as_path))?
            .with_overrides(self.shots, self.seed, self.theta);
        config.validate()?;
        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("QRELAY_LOG").unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let config_file = cli.config.as_ref();
    let result = match cli.command {
        Commands::Compare {
            instructions,
            format,
        } => compare::execute(instructions, format),

        Commands::Teleport { run, swapped } => run
            .resolve(config_file)
            .and_then(|config| teleport::execute(&config, swapped, run.format)),

        Commands::Broadcast { run, variant } => run
            .resolve(config_file)
            .and_then(|config| broadcast::execute(&config, variant, run.format)),

        Commands::Guide => {
            guide::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
