//! # Redline CLI
//!
//! Redline — natural-language review rules for your repository
//!
//! Redline evaluates files against the plain-language rules configured in
//! `.redline/config.json`, using an external evaluation service to judge
//! whether each rule is violated.
//!
//! ## Usage
//!
//! ```bash
//! # Review everything in scope
//! redline review files
//!
//! # Review a subset
//! redline review files "docs/**/*.md" --ignore "CHANGELOG.md"
//! ```

use clap::{Parser, Subcommand};
use redline::commands;

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let mut log_builder = env_logger::Builder::from_default_env();
    if verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Info);
    }
    log_builder.init();
}

/// Main CLI structure
#[derive(Parser)]
#[command(name = "redline")]
#[command(about = "Redline — natural-language review rules for your repository", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Review content against the configured rulesets
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
}

/// Review subcommands
#[derive(Subcommand)]
enum ReviewCommands {
    /// Review files in the current project
    Files {
        /// Glob patterns selecting files to review (all files when omitted)
        #[arg(value_name = "PATTERN")]
        files: Vec<String>,
        /// Glob patterns excluding files from review (can be repeated)
        #[arg(long, value_name = "PATTERN")]
        ignore: Vec<String>,
        /// Enable verbose output
        #[arg(long, short = 'v')]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let exit_code = run_command(cli.command).await;
    std::process::exit(exit_code);
}

async fn run_command(command: Commands) -> i32 {
    use redline::exit_codes::*;

    match command {
        Commands::Review { command } => match command {
            ReviewCommands::Files {
                files,
                ignore,
                verbose,
            } => {
                init_logger(verbose);
                let args = commands::files::FilesArgs {
                    files,
                    ignore,
                    verbose,
                };
                match commands::files::execute(args).await {
                    Ok(exit_code) => exit_code,
                    Err(e) => {
                        eprintln!("Review error: {}", e);
                        EXIT_CONFIG_ERROR
                    }
                }
            }
        },
    }
}
