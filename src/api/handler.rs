//! HTTP routes.
//!
//! - `GET /` and `GET /health`: liveness
//! - `GET /leads`: the full lead collection
//! - `POST /upload_csv`: CSV ingestion (delegated to [`IngestPipeline`])
//! - `POST /send`: a single ad-hoc SMS

use actix_multipart::Multipart;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use super::helpers;
use super::server::AppState;
use super::upload::{self, FILE_FIELD};
use crate::core::models::SmsRequest;
use crate::errors::AppError;
use crate::ingest::IngestPipeline;
use crate::utils::filename::{has_csv_extension, sanitize_filename};

/// Registers every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(root)
        .service(health)
        .service(list_leads)
        .service(upload_csv)
        .service(send_sms);
}

// Malformed JSON bodies get the same `{"error": ..}` shape as other 400s.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

#[get("/")]
async fn root() -> HttpResponse {
    HttpResponse::Ok().json(helpers::status_running())
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

#[get("/leads")]
async fn list_leads(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let leads = state.store.all().await?;
    Ok(HttpResponse::Ok().json(leads))
}

#[post("/upload_csv")]
async fn upload_csv(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let correlation_id = Uuid::new_v4();

    let Some(file) =
        upload::read_file_field(payload, FILE_FIELD, state.max_upload_bytes).await?
    else {
        info!(%correlation_id, "Upload rejected: no file part");
        return Ok(helpers::err_response(StatusCode::BAD_REQUEST, "No file part"));
    };

    if file.filename.trim().is_empty() {
        info!(%correlation_id, "Upload rejected: empty filename");
        return Ok(helpers::err_response(StatusCode::BAD_REQUEST, "No selected file"));
    }

    let Some(filename) = sanitize_filename(&file.filename) else {
        info!(%correlation_id, raw = %file.filename, "Upload rejected: unusable filename");
        return Ok(helpers::err_response(StatusCode::BAD_REQUEST, "Invalid filename"));
    };

    if !has_csv_extension(&filename) {
        info!(%correlation_id, %filename, "Upload rejected: not a CSV");
        return Ok(helpers::err_response(StatusCode::BAD_REQUEST, "File must be a CSV"));
    }

    info!(%correlation_id, %filename, bytes = file.bytes.len(), "Processing CSV upload");
    upload::save_upload(&state.upload_dir, &filename, &file.bytes).await?;

    let summary = IngestPipeline::new(state.notifier.as_ref(), &state.store)
        .process(&file.bytes)
        .await
        .inspect_err(|e| error!(%correlation_id, error = %e, "CSV processing failed"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "CSV processed successfully",
        "summary": summary,
    })))
}

#[post("/send")]
async fn send_sms(
    state: web::Data<AppState>,
    req: web::Json<SmsRequest>,
) -> Result<HttpResponse, AppError> {
    let to = req.to.trim();
    if to.is_empty() {
        return Err(AppError::Validation("Field 'to' is required".to_string()));
    }

    let delivery = state.notifier.send(to, &req.message).await;
    if !delivery.delivered {
        return Err(AppError::Provider(delivery.detail));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": delivery.detail,
        "provider": delivery.provider,
    })))
}
