use lead_intake::api::{AppState, start_server};
use lead_intake::core::config::AppConfig;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the real environment still applies.
    let _ = dotenvy::dotenv();
    lead_intake::setup_logging();

    let config = AppConfig::from_env().inspect_err(|e| error!("Config error: {}", e))?;
    info!(
        leads_file = %config.leads_file.display(),
        upload_dir = %config.upload_dir.display(),
        "Starting lead intake API"
    );

    let state = AppState::from_config(&config).await?;
    start_server(state, &config)?.await?;

    Ok(())
}
