use apr_axum::start_server;
use apr_sqlite::Db;
use aprdemo::{AppConfig, Cli, Commands, impls::DemoApp, import_file};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // By convention, we leverage `tracing` to instrument and log various
    // operations throughout this project.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::import()?;
    let AppConfig { server, database } = AppConfig::load(&cli)?;

    let db = Db::open(&database).await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Import { file } => {
            let written = import_file(&db, &file).await?;
            tracing::info!(written, file = %file.display(), "import complete");
        }
        Commands::Serve => {
            start_server(server, DemoApp { db }).await?;
        }
    }

    Ok(())
}
