//! Lesson Pilot: entry point.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use lesson_pilot_runtime::cli;
use lesson_pilot_runtime::cli::run_cmd::RunArgs;

#[derive(Parser)]
#[command(
    name = "lesson-pilot",
    about = "Lesson Pilot: plays language lessons in Chromium without human input",
    version,
    after_help = "Credentials are read from LESSON_PILOT_USERNAME and LESSON_PILOT_PASSWORD.\nRun 'lesson-pilot' with no command to start a run."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and work through the skill tree (default)
    Run(RunArgs),
    /// Check environment and diagnose issues
    Doctor {
        /// Path to the Chromium binary
        #[arg(long)]
        chromium: Option<String>,
        /// Site to open
        #[arg(long)]
        url: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

fn init_logging(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json);

    let result = match cli.command {
        None => cli::run_cmd::run(&RunArgs::default(), cli.json).await,
        Some(Commands::Run(args)) => cli::run_cmd::run(&args, cli.json).await,
        Some(Commands::Doctor { chromium, url }) => {
            cli::doctor::run(chromium.as_deref(), url.as_deref()).await
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "lesson-pilot", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": true,
                    "message": format!("{e:#}"),
                })
            );
        } else {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
