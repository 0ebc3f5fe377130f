mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Inspect and validate OpenStack-compatible cloud configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with the layered cloud configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration for a cloud, secrets masked
    Show {
        /// Cloud name; falls back to OS_CLOUD, then to a sole entry
        #[arg(short, long)]
        cloud: Option<String>,
    },
    /// Resolve a cloud and check its credentials are complete
    Validate {
        /// Cloud name; falls back to OS_CLOUD, then to a sole entry
        #[arg(short, long)]
        cloud: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(ConfigCommands::Show { cloud }) => commands::show::run(cloud),
        Commands::Config(ConfigCommands::Validate { cloud }) => commands::validate::run(cloud),
    }
}
