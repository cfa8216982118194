//! File-backed lead collection.
//!
//! The whole collection lives in one pretty-printed JSON array. Every call
//! re-reads the file; appends rewrite it in full through a temporary sibling
//! file that is renamed into place.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::models::{Lead, NewLead};
use crate::errors::AppError;

pub struct LeadStore {
    path: PathBuf,
    // Serialises the read-modify-write cycle of `append` within this process.
    write_lock: Mutex<()>,
}

impl LeadStore {
    /// Opens the store at `path`, creating an empty collection if the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the initial file cannot be
    /// created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("create {}: {e}", parent.display()))
            })?;
        }

        if fs::try_exists(&path).await? {
            debug!(path = %path.display(), "Using existing lead collection");
        } else {
            fs::write(&path, b"[]").await.map_err(|e| {
                AppError::Storage(format!("initialise {}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "Created empty lead collection");
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamps `lead` with the current time and appends it to the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read, parsed or rewritten.
    pub async fn append(&self, lead: NewLead) -> Result<Lead, AppError> {
        let _guard = self.write_lock.lock().await;

        let mut leads = self.read_all().await?;
        let lead = lead.stamp(Utc::now());
        leads.push(lead.clone());
        self.write_all(&leads).await?;

        debug!(count = leads.len(), "Lead appended");
        Ok(lead)
    }

    /// Returns every stored lead in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or parsed.
    pub async fn all(&self) -> Result<Vec<Lead>, AppError> {
        self.read_all().await
    }

    async fn read_all(&self) -> Result<Vec<Lead>, AppError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            // Removed after startup: behave like a fresh collection.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };

        Ok(serde_json::from_slice(&raw)?)
    }

    async fn write_all(&self, leads: &[Lead]) -> Result<(), AppError> {
        let body = serde_json::to_vec_pretty(leads)?;
        let tmp = self.tmp_path();

        fs::write(&tmp, &body)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::Storage(format!("replace {}: {e}", self.path.display()))
        })?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
