//! Traceline CLI - requirement-to-code alignment and consistency review
//!
//! Decomposes a Markdown requirement document, aligns its units against
//! source code through a completion model, and reviews the matched code for
//! consistency.

mod commands;

use clap::{Parser, Subcommand};
use traceline_core::{Config, Lang};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{AlignArgs, ChunkArgs, DecomposeArgs, GenerateArgs, ReviewArgs};

/// Traceline: requirement-to-code alignment and consistency review
#[derive(Parser, Debug)]
#[command(name = "traceline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model identifier (overrides config and env)
    #[arg(long, global = true, env = "TRACELINE_MODEL")]
    model: Option<String>,

    /// Prompt language, zh or en (overrides config and env)
    #[arg(long, global = true)]
    lang: Option<Lang>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Decompose a requirement document into units
    #[command(visible_alias = "dec")]
    Decompose(DecomposeArgs),

    /// Chunk a source file into token-budgeted windows
    Chunk(ChunkArgs),

    /// Align a requirement document against source files
    #[command(visible_alias = "a")]
    Align(AlignArgs),

    /// Review aligned code for consistency with its requirement
    #[command(visible_alias = "rev")]
    Review(ReviewArgs),

    /// Generate a requirement description from aligned code
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.model.clone(), cli.lang)?;

    if cli.verbose {
        tracing::info!(
            base_url = %config.api.base_url,
            model = %config.api.model,
            lang = %config.lang,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("traceline {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Decompose(args)) => {
            args.execute()?;
        }
        Some(Commands::Chunk(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Align(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Review(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Generate(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Config) => {
            println!("Traceline Configuration");
            println!("=======================");
            println!();
            println!("Endpoint:");
            println!("  base_url: {}", config.api.base_url);
            println!("  model: {}", config.api.model);
            println!();
            println!("Pipeline:");
            println!("  lang: {}", config.lang);
            println!("  max_chunk_tokens: {}", config.max_chunk_tokens);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Traceline - requirement-to-code alignment and consistency review");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
