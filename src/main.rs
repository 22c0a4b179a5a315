use anyhow::Result;
use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand};
use ratewatch::core::Currency;
use ratewatch::core::log::init_logging;
use ratewatch::{ShowOptions, WindowArg};

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

#[derive(Args)]
#[command(group(ArgGroup::new("window").args(["days", "last"])))]
struct WindowArgs {
    /// Days of history ending today
    #[arg(short, long)]
    days: Option<u32>,

    /// Use the provider's last N quotations instead of a date range
    #[arg(short, long)]
    last: Option<u32>,
}

impl From<WindowArgs> for WindowArg {
    fn from(args: WindowArgs) -> WindowArg {
        match (args.days, args.last) {
            (Some(n), _) => WindowArg::Days(n),
            (None, Some(n)) => WindowArg::Last(n),
            (None, None) => WindowArg::Configured,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the rate dashboard for one currency
    Show {
        /// Currency code (USD, EUR, UAH)
        #[arg(short = 'C', long)]
        currency: Option<Currency>,

        #[command(flatten)]
        window: WindowArgs,

        /// Print points and metrics as JSON
        #[arg(long)]
        json: bool,

        /// Also list every point in a table
        #[arg(long)]
        table: bool,
    },
    /// Display rate changes for all supported currencies
    Overview {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Display the latest published rate
    Current {
        /// Currency code; all supported currencies when omitted
        #[arg(short = 'C', long)]
        currency: Option<Currency>,
    },
    /// List supported currencies
    Currencies,
}

impl From<Commands> for ratewatch::AppCommand {
    fn from(cmd: Commands) -> ratewatch::AppCommand {
        match cmd {
            Commands::Show {
                currency,
                window,
                json,
                table,
            } => ratewatch::AppCommand::Show {
                currency,
                window: window.into(),
                options: ShowOptions { json, table },
            },
            Commands::Overview { window } => ratewatch::AppCommand::Overview {
                window: window.into(),
            },
            Commands::Current { currency } => ratewatch::AppCommand::Current { currency },
            Commands::Currencies => ratewatch::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ratewatch::cli::setup::setup(),
        Some(cmd) => ratewatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
