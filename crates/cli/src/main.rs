//! Building ontology sync CLI
//!
//! A command-line tool that maps a source station's free-form point naming
//! onto a target platform's canonical ontology and pushes the result, with
//! inspection commands for both sides and a correction-learning workflow.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, learn, sync};

/// Building ontology sync CLI
#[derive(Parser)]
#[command(name = "ontosync")]
#[command(author, version, about = "Sync building-automation points into a BMS platform", long_about = None)]
pub struct Cli {
    /// Source station base URL (overrides configuration)
    #[arg(long)]
    pub source_url: Option<String>,

    /// Target platform base URL (overrides configuration)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Target platform access token (can also be set via ACCESS_TOKEN)
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync station entities into the target platform
    Sync(sync::SyncArgs),

    /// List resources on either side of the pipeline
    #[command(subcommand)]
    Get(GetCommands),

    /// Work with the correction learner
    #[command(subcommand)]
    Learn(LearnCommands),
}

#[derive(Subcommand)]
pub enum GetCommands {
    /// List buildings in the target platform
    Buildings,

    /// List devices in a target building
    Devices {
        /// Building ID (falls back to the configured building)
        building: Option<String>,
    },

    /// List points in a target building
    Points {
        /// Building ID (falls back to the configured building)
        building: Option<String>,

        /// Only points belonging to this device
        #[arg(long, short)]
        device: Option<String>,
    },

    /// List datasources in a target building
    Datasources {
        /// Building ID (falls back to the configured building)
        building: Option<String>,
    },

    /// List entities exposed by the source station
    Entities,
}

#[derive(Subcommand)]
pub enum LearnCommands {
    /// Show learner statistics
    Stats,

    /// Record one human correction
    Correct {
        /// The point name as the station shows it
        point: String,

        /// The correct canonical field for that point
        field: String,

        /// Equipment type context (e.g. AHU, VAV)
        #[arg(long, short)]
        equipment: Option<String>,
    },

    /// Trigger a training run
    Train,

    /// Show the learner's current point mappings
    Mappings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = config::Settings::load()?;

    match &cli.command {
        Commands::Sync(args) => sync::run(args, &cli, &settings).await?,
        Commands::Get(get_cmd) => match get_cmd {
            GetCommands::Buildings => inspect::buildings(&cli, &settings).await?,
            GetCommands::Devices { building } => {
                inspect::devices(&cli, &settings, building.as_deref()).await?;
            }
            GetCommands::Points { building, device } => {
                inspect::points(&cli, &settings, building.as_deref(), device.as_deref()).await?;
            }
            GetCommands::Datasources { building } => {
                inspect::datasources(&cli, &settings, building.as_deref()).await?;
            }
            GetCommands::Entities => inspect::entities(&cli, &settings).await?,
        },
        Commands::Learn(learn_cmd) => match learn_cmd {
            LearnCommands::Stats => learn::stats(&cli, &settings).await?,
            LearnCommands::Correct {
                point,
                field,
                equipment,
            } => learn::correct(&cli, &settings, point, field, equipment.clone()).await?,
            LearnCommands::Train => learn::train(&cli, &settings).await?,
            LearnCommands::Mappings => learn::mappings(&cli, &settings).await?,
        },
    }

    Ok(())
}

/// Route diagnostics to stderr so tables and JSON stay clean on stdout
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "ontosync=debug,ontosync_cli=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
