use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod audio;
mod commands;
mod output;

#[derive(Parser)]
#[command(name = "hypnoflow", version, about = "HypnoFlow relaxation exercises")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available exercises
    Menu {
        #[command(flatten)]
        args: commands::menu::MenuArgs,
    },
    /// Run an exercise in real time
    Run {
        #[command(flatten)]
        args: commands::run::RunArgs,
    },
    /// Run an exercise on virtual time and print the final state
    Simulate {
        #[command(flatten)]
        args: commands::simulate::SimulateArgs,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("HYPNOFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Menu { args } => commands::menu::run(args),
        Commands::Run { args } => commands::run::run(args),
        Commands::Simulate { args } => commands::simulate::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
