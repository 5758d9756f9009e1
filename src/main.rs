use anyhow::Result;
use clap::{Parser, Subcommand};

/// umami - ingredient catalog and synergy calculator
#[derive(Parser)]
#[command(name = "umami")]
#[command(about = "Umami ingredient catalog and composition calculator", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Seed reference ingredients
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = umami::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    umami::observability::init_observability(&config.observability)?;

    let result = match cli.command {
        Commands::Serve { host, port } => umami::cli::serve(config, host, port).await,
        Commands::Migrate => umami::cli::migrate(&config).await,
        Commands::Reset => umami::cli::reset(&config).await,
        Commands::Seed => umami::cli::seed(&config).await.map(|_| ()),
    };

    umami::observability::shutdown_observability();

    result
}
