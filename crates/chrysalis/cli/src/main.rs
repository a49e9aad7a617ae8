//! Chrysalis CLI - run crystallization cycles from the terminal
//!
//! Each invocation declares the default axioms, optionally continues a
//! persisted lifetime (`--state`), and then:
//! - runs one crystallization cycle and renders its trace
//! - evolves for a number of steps and renders the trajectory
//! - reports the system's self-description
//! - reflects on a fresh cycle and reports the synthesised constraint

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use chrysalis_core::{
    render_trace, render_trajectory, Chrysalis, ChrysalisResult, ConstraintSource, ConstraintSpec,
    Layer,
};
use chrysalis_types::portable;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod output;

use config::CliConfig;
use error::CliResult;

/// Chrysalis CLI application
#[derive(Parser)]
#[command(name = "chrysalis")]
#[command(about = "Chrysalis - self-evolving constraint crystallization", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CHRYSALIS_CONFIG")]
    config: Option<PathBuf>,

    /// Persisted record to continue from and write to after every bind
    #[arg(short, long, env = "CHRYSALIS_STATE")]
    state: Option<PathBuf>,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run one crystallization cycle and show its trace
    Cycle,

    /// Evolve through repeated cycles, reflection and perturbation
    Evolve {
        /// Number of evolution steps
        #[arg(long, default_value_t = 5)]
        steps: usize,
    },

    /// Describe the system's current state
    Introspect {
        /// Emit the machine-readable description
        #[arg(long)]
        json: bool,
    },

    /// Run a cycle and reflect on its ambiguity
    Reflect,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("[ERROR] {}", err);
            return ExitCode::FAILURE;
        }
    };

    let default_filter = if cli.verbose {
        "info".to_string()
    } else {
        config.log_filter.clone().unwrap_or_else(|| "warn".to_string())
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {}", portable(&err.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: CliConfig) -> CliResult<()> {
    let mut chrysalis = Chrysalis::with_config(config.chrysalis.clone())?;
    declare_axioms(&mut chrysalis)?;

    if let Some(path) = cli.state.or(config.chrysalis.state_path) {
        let continued = chrysalis.bind_etheric(&path);
        info!(
            location = %path.display(),
            continued,
            cycle_count = chrysalis.cycle_count(),
            "bound to persisted record"
        );
    }

    match cli.command {
        Commands::Cycle => {
            let trace = chrysalis.crystallize()?;
            println!("{}", render_trace(&trace));
        }
        Commands::Evolve { steps } => {
            let trajectory = chrysalis.evolve(steps)?;
            println!("{}", render_trajectory(&trajectory));
        }
        Commands::Introspect { json } => {
            if json {
                println!("{}", output::ascii_json(&chrysalis.describe_self())?);
            } else {
                println!("{}", chrysalis.introspect());
            }
        }
        Commands::Reflect => {
            let trace = chrysalis.crystallize()?;
            println!("{}", render_trace(&trace));
            println!();
            match chrysalis.reflect()? {
                Some(descriptor) => {
                    let rule = descriptor
                        .spec
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    println!(
                        "  [OK] reflected: {} {}",
                        portable(&descriptor.name),
                        portable(&rule)
                    );
                }
                None => println!(
                    "  [--] nothing to reflect on ({} survivor(s))",
                    trace.survivor_count()
                ),
            }
        }
    }

    Ok(())
}

/// The axioms every run starts from.
fn declare_axioms(chrysalis: &mut Chrysalis) -> ChrysalisResult<()> {
    chrysalis.declare_spec(
        "existence",
        ConstraintSpec::Exists,
        Layer::Mental,
        ConstraintSource::External,
    )?;
    chrysalis.declare_spec(
        "has_structure",
        ConstraintSpec::IsMapping,
        Layer::Mental,
        ConstraintSource::External,
    )?;
    chrysalis.declare_spec(
        "alive",
        ConstraintSpec::key_truthy("alive"),
        Layer::Astral,
        ConstraintSource::External,
    )?;
    Ok(())
}
