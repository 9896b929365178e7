//! User Registry
//!
//! Console application that validates users, stores the valid and unique
//! ones in memory and appends every failure to an error log.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{Console, UserManager};
use eyre::Result;
use tracing::info;

mod config;
mod runner;

use config::Config;

#[derive(Parser)]
#[command(name = "user-registry")]
#[command(about = "Validate and register users, logging failures to a file")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print the final user listing as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo batch, then one manual entry (default)
    Run,

    /// Run the demo batch only
    Demo,

    /// Enter one user interactively
    Add,
}

fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let cli = Cli::parse();

    info!(
        error_log = %config.registry.error_log_path.display(),
        failure_rate = config.registry.persistence_failure_rate,
        "Starting user registry"
    );

    let mut manager = UserManager::in_memory(
        config.registry.error_log_path.clone(),
        config.registry.persistence_failure_rate,
        Console::stdout(),
    );
    let mut input = std::io::stdin().lock();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            runner::run_batch(&mut manager, runner::demo_candidates())?;
            runner::manual_entry(&mut manager, &mut input)?;
        }
        Commands::Demo => {
            runner::run_batch(&mut manager, runner::demo_candidates())?;
        }
        Commands::Add => {
            runner::manual_entry(&mut manager, &mut input)?;
        }
    }

    runner::print_listing(&manager, cli.json)?;

    Ok(())
}
