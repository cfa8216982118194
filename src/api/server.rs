use actix_cors::Cors;
use actix_web::{App, HttpServer, dev::Server, web};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

use super::handler;
use crate::core::LeadStore;
use crate::core::config::{AppConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::errors::AppError;
use crate::sms::{Notifier, SmsSender};

/// Shared per-process state handed to every handler.
pub struct AppState {
    pub notifier: Arc<dyn SmsSender>,
    pub store: Arc<LeadStore>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(notifier: Arc<dyn SmsSender>, store: Arc<LeadStore>, upload_dir: PathBuf) -> Self {
        Self {
            notifier,
            store,
            upload_dir,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    #[must_use]
    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Opens the lead store, prepares the upload directory and resolves the
    /// SMS provider.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be initialised or the provider
    /// client cannot be built.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let store = LeadStore::open(&config.leads_file).await?;
        fs::create_dir_all(&config.upload_dir).await.map_err(|e| {
            AppError::Storage(format!("create {}: {e}", config.upload_dir.display()))
        })?;
        let notifier = Notifier::from_config(config)?;

        Ok(Self::new(
            Arc::new(notifier),
            Arc::new(store),
            config.upload_dir.clone(),
        )
        .with_upload_limit(config.max_upload_bytes))
    }
}

/// Binds the HTTP server. The returned [`Server`] must be awaited to run.
///
/// # Errors
///
/// Returns an error if the listen address cannot be bound.
pub fn start_server(state: AppState, config: &AppConfig) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(handler::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    info!(host = %config.host, port = config.port, "HTTP server listening");
    Ok(server)
}
