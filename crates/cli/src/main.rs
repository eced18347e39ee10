//! `agentic` CLI: the main entry point.
//!
//! Commands:
//! - `react`: Answer a question with the tool-using ReAct agent
//! - `reflect`: Generate and iteratively critique an answer
//! - `tools`: List built-in tool signatures
//! - `config`: Show, locate or validate the configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "agentic",
    about = "ReAct and reflection agents on top of a hosted LLM",
    version
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
    /// Answer a question with the ReAct agent and the built-in tools
    React {
        /// The user question
        #[arg(short, long)]
        message: String,

        /// Round budget (defaults to react.max_rounds)
        #[arg(long)]
        max_rounds: Option<usize>,

        /// Prefix placed before the ReAct instructions
        #[arg(long)]
        system_prompt: Option<String>,
    },

    /// Generate an answer and refine it through self-critique
    Reflect {
        /// The user request
        #[arg(short, long)]
        message: String,

        /// Step budget (defaults to reflection.n_steps)
        #[arg(long)]
        steps: Option<usize>,

        /// Prefix for the generator's system prompt
        #[arg(long)]
        generation_prompt: Option<String>,

        /// Prefix for the critic's system prompt
        #[arg(long)]
        reflection_prompt: Option<String>,
    },

    /// Print the signatures of the built-in tools
    Tools,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets redacted)
    Show,
    /// Print the config file path
    Path,
    /// Load and validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

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
        Commands::React {
            message,
            max_rounds,
            system_prompt,
        } => commands::react::run(message, max_rounds, system_prompt).await?,
        Commands::Reflect {
            message,
            steps,
            generation_prompt,
            reflection_prompt,
        } => {
            commands::reflect::run(message, steps, generation_prompt, reflection_prompt).await?
        }
        Commands::Tools => commands::tools::run()?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Path => commands::config_cmd::path()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
        },
    }

    Ok(())
}
