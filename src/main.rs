use anyhow::Result;
use cbrates::core::DateInput;
use cbrates::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display exchange rates for a date
    Rates {
        /// Date as YYYY-MM-DD, defaults to today
        #[arg(short, long, conflicts_with = "offset")]
        date: Option<String>,

        /// Days relative to today, e.g. -1, -7 or -30
        #[arg(short, long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Also display saved history
        #[arg(long)]
        history: bool,
    },
    /// Display recently saved rates
    History {
        /// Number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

impl From<Commands> for cbrates::AppCommand {
    fn from(cmd: Commands) -> cbrates::AppCommand {
        match cmd {
            Commands::Rates {
                date,
                offset,
                history,
            } => {
                let date = match (date, offset) {
                    (Some(date), _) => DateInput::Text(date),
                    (None, Some(days)) => DateInput::Offset(days),
                    (None, None) => DateInput::Offset(0),
                };
                cbrates::AppCommand::Rates {
                    date,
                    with_history: history,
                }
            }
            Commands::History { limit } => cbrates::AppCommand::History { limit },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cbrates::cli::setup::setup(),
        Some(cmd) => cbrates::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
