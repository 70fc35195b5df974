use clap::Parser;
use roadrecord::auth::SessionStore;
use roadrecord::config::{AppConfig, Args};
use roadrecord::server::ServerBuilder;
use roadrecord::storage::InMemoryRecordStore;
use roadrecord::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args)?;

    // Hashing the configured passwords is part of validation
    let sessions = SessionStore::from_config(&config.auth)?;

    if args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    telemetry::init_tracing(&config.log_level)?;
    tracing::debug!(?args, "starting");

    if config.auth.users.is_empty() {
        tracing::warn!("no users configured; every entity route will answer 403");
    }

    ServerBuilder::new()
        .with_store(InMemoryRecordStore::new())
        .with_sessions(sessions)
        .serve(&config.bind_address())
        .await
}
