//! Monoikos CLI - drive the Monte-Carlo optimizer over the bundled
//! environments and inspect the learned strategies.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "monoikos")]
#[command(version, about = "Monte-Carlo control for finite episodic decision processes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize the Count validation environment
    Count(monoikos::cli::commands::count::CountArgs),

    /// Optimize the Blackjack reference environment
    Blackjack(monoikos::cli::commands::blackjack::BlackjackArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Count(args) => monoikos::cli::commands::count::execute(args),
        Commands::Blackjack(args) => monoikos::cli::commands::blackjack::execute(args),
    }
}
