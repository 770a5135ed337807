//! RelayClaw CLI: the main entry point.
//!
//! Commands:
//! - `chat`   Interactive chat or single-message mode
//! - `demo`   Run the built-in sample queries
//! - `tools`  Print the registered tool schemas

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "relayclaw",
    about = "RelayClaw: a tool-calling chat agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Run the sample queries, each in a fresh conversation
    Demo,

    /// Print the tool schemas sent to the model
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Demo => commands::demo::run().await?,
        Commands::Tools => commands::tools::run()?,
    }

    Ok(())
}
