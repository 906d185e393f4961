use anyhow::Result;
use clap::{Parser, Subcommand};
use libswap_cli::{is_failure, MigrateOptions};
use libswap_model::{Direction, NodeId};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Migrate component instances between parallel design-system libraries
#[derive(Parser)]
#[command(name = "libswap", version, about)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List local components and variant groups
    Export {
        /// Scene file to read
        #[arg(long)]
        document: PathBuf,
    },

    /// Clone the selected containers and swap their instances
    Migrate {
        /// Scene file to read
        #[arg(long)]
        document: PathBuf,
        /// Mapping table JSON (`webToApp` / `appToWeb`)
        #[arg(long)]
        mapping: PathBuf,
        /// `to-app` or `to-web`
        #[arg(long)]
        direction: Direction,
        /// Node ids to select instead of the scene's stored selection
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
        /// Migration settings (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the migrated scene here
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("LIBSWAP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
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
    init_tracing(cli.log_json);

    let message = match cli.command {
        Commands::Export { document } => libswap_cli::export(&document).await?,
        Commands::Migrate {
            document,
            mapping,
            direction,
            select,
            config,
            output,
        } => {
            let options = MigrateOptions {
                document,
                mapping,
                direction,
                select: select.into_iter().map(NodeId::new).collect(),
                config,
                output,
            };
            libswap_cli::migrate(&options).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&message)?);
    if is_failure(&message) {
        process::exit(1);
    }
    Ok(())
}
