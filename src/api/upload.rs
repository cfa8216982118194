//! Multipart upload handling for `POST /upload_csv`.

use actix_multipart::Multipart;
use futures::TryStreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::errors::AppError;

/// Form field that carries the CSV.
pub const FILE_FIELD: &str = "file";

#[derive(Debug)]
pub struct UploadedFile {
    /// Filename as sent by the client, unsanitised. May be empty.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Reads the multipart body and returns the first field named `field_name`.
///
/// Other fields are drained and ignored. A body that is not multipart at all
/// yields `Ok(None)`, the same as a multipart body without the field.
///
/// # Errors
///
/// Returns a validation error if the payload breaks off after the first part,
/// or if the wanted field grows past `max_bytes`.
pub async fn read_file_field(
    mut payload: Multipart,
    field_name: &str,
    max_bytes: usize,
) -> Result<Option<UploadedFile>, AppError> {
    let mut found: Option<UploadedFile> = None;
    let mut seen_part = false;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if !seen_part => {
                warn!(error = %e, "Request body is not a readable multipart form");
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::Validation(format!("Invalid multipart payload: {e}")));
            }
        };
        seen_part = true;

        let disposition = field.content_disposition().cloned();
        let wanted = found.is_none()
            && disposition.as_ref().and_then(|cd| cd.get_name()) == Some(field_name);

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
        {
            if wanted {
                if bytes.len() + chunk.len() > max_bytes {
                    warn!(limit = max_bytes, "Upload rejected: file too large");
                    return Err(AppError::Validation(format!(
                        "File exceeds the {max_bytes} byte upload limit"
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }
        }

        if wanted {
            let filename = disposition
                .as_ref()
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default()
                .to_string();
            found = Some(UploadedFile { filename, bytes });
        }
    }

    Ok(found)
}

/// Writes `bytes` to `dir/filename`, replacing any earlier upload of the
/// same name.
///
/// # Errors
///
/// Returns a storage error if the directory or file cannot be written.
pub async fn save_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Storage(format!("create {}: {e}", dir.display())))?;

    let path = dir.join(filename);
    fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Storage(format!("write {}: {e}", path.display())))?;

    info!(path = %path.display(), bytes = bytes.len(), "Upload saved");
    Ok(path)
}
