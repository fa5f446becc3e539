//! auditchain - verify compliance hash chains
//!
//! # Usage
//!
//! ```bash
//! # Check an exported history
//! auditchain verify history.json
//! cat history.json | auditchain verify -
//!
//! # Fetch and verify a project's history, comparing with the server's verdict
//! auditchain fetch --project my-project --api-key $KEY --remote
//!
//! # Configuration commands
//! auditchain config show
//! auditchain config validate
//! auditchain config init
//! ```
//!
//! Exit codes: 0 verified/ok, 1 error, 2 chain broken, 3 verification unavailable.

use auditchain_cli::commands::{
    config::ConfigCommand, fetch::FetchArgs, login::LoginArgs, seal::SealArgs, stats::StatsArgs,
    summary::SummaryArgs, verify::VerifyArgs,
};
use auditchain_cli::{commands, CliContext, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "auditchain")]
#[command(version)]
#[command(about = "Verify tamper-evident compliance audit chains", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (table, json, plain)
    #[arg(short, long, global = true, default_value = "table")]
    output_format: String,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the hash chain in a JSON file
    Verify(VerifyArgs),

    /// Compliance totals for a JSON history
    Summary(SummaryArgs),

    /// Seal unsealed payloads into a new chain
    Seal(SealArgs),

    /// Fetch a project's history and verify it
    Fetch(FetchArgs),

    /// Dashboard statistics
    Stats(StatsArgs),

    /// Sign in and obtain an access token
    Login(LoginArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "auditchain=debug"
    } else {
        "auditchain=info"
    };
    let filter = match default_directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Parse output format
    let output_format: OutputFormat = cli.output_format.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {}. Using table format.", e);
        OutputFormat::Table
    });

    // Create CLI context
    let mut ctx = match CliContext::new(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    ctx.output_format = output_format;
    ctx.quiet = cli.quiet;

    // Execute command
    let result = match cli.command {
        Commands::Verify(args) => commands::verify::execute(&ctx, args).await,
        Commands::Summary(args) => commands::summary::execute(&ctx, args).await,
        Commands::Seal(args) => commands::seal::execute(&ctx, args).await,
        Commands::Fetch(args) => commands::fetch::execute(&ctx, args).await,
        Commands::Stats(args) => commands::stats::execute(&ctx, args).await,
        Commands::Login(args) => commands::login::execute(&ctx, args).await,
        Commands::Config { command } => commands::config::execute(&ctx, command).await,
    };

    match result {
        Ok(exit) => std::process::exit(exit.code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
