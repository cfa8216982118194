mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{App, test, web};
use common::{RecordingSender, multipart_body, multipart_content_type};
use lead_intake::api::{AppState, configure};
use lead_intake::core::LeadStore;
use lead_intake::sms::SmsSender;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    dir: TempDir,
    sender: Arc<RecordingSender>,
    state: web::Data<AppState>,
}

impl Harness {
    async fn new(sender: RecordingSender) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadStore::open(dir.path().join("leads.json")).await.unwrap();
        let sender = Arc::new(sender);
        let notifier: Arc<dyn SmsSender> = sender.clone();
        let state = web::Data::new(AppState::new(
            notifier,
            Arc::new(store),
            dir.path().join("uploads"),
        ));
        Self { dir, sender, state }
    }

    fn leads_path(&self) -> std::path::PathBuf {
        self.dir.path().join("leads.json")
    }
}

fn upload_request(parts: &[(&str, Option<&str>, &[u8])]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/upload_csv")
        .insert_header((CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(parts))
}

#[actix_web::test]
async fn test_root_reports_running() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "running");
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_health() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[actix_web::test]
async fn test_leads_on_fresh_store_is_empty_array() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/leads").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_upload_without_file_field_is_rejected() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = upload_request(&[("comment", None, b"hello".as_slice())]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "No file part" }));
}

#[actix_web::test]
async fn test_upload_with_non_multipart_body_is_rejected() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/upload_csv")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file part");
}

#[actix_web::test]
async fn test_upload_with_empty_filename_is_rejected() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = upload_request(&[("file", Some(""), b"".as_slice())]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No selected file");
}

#[actix_web::test]
async fn test_upload_of_non_csv_is_rejected() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = upload_request(&[("file", Some("leads.xlsx"), b"name,phone\n".as_slice())]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "File must be a CSV");
    assert!(h.sender.calls().is_empty());
}

#[actix_web::test]
async fn test_upload_processes_rows_and_lists_leads() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let csv = b"name,phone,project\nAlice,+1555000111,SolarRoof\nBob,,SolarRoof\n";
    let req = upload_request(&[
        ("note", None, b"march import".as_slice()),
        ("file", Some("march leads.csv"), csv.as_slice()),
    ])
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "CSV processed successfully");
    assert_eq!(body["summary"]["sent"], 1);
    assert_eq!(body["summary"]["skipped"], 1);
    assert_eq!(body["summary"]["rows"][1]["status"], "skipped");

    assert_eq!(h.sender.calls().len(), 1);
    let saved = h.dir.path().join("uploads").join("march_leads.csv");
    assert_eq!(std::fs::read(saved).unwrap(), csv.to_vec());

    let leads: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/leads").to_request())
            .await;
    let leads = leads.as_array().unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["name"], "Alice");
    assert_eq!(leads[0]["phone"], "+1555000111");
    assert_eq!(leads[0]["project"], "SolarRoof");
    assert!(leads[0]["timestamp"].is_string());
}

#[actix_web::test]
async fn test_upload_over_size_limit_is_rejected() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let notifier: Arc<dyn SmsSender> = h.sender.clone();
    let state = web::Data::new(
        AppState::new(notifier, Arc::clone(&h.state.store), h.dir.path().join("uploads"))
            .with_upload_limit(16),
    );
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let csv = b"name,phone,project\nAlice,+1555000111,SolarRoof\n";
    let req = upload_request(&[("file", Some("leads.csv"), csv.as_slice())]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("upload limit"));
    assert!(h.sender.calls().is_empty());
    assert!(!h.dir.path().join("uploads").join("leads.csv").exists());
}

#[actix_web::test]
async fn test_header_only_upload_succeeds() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = upload_request(&[("file", Some("leads.csv"), b"name,phone,project\n".as_slice())]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "CSV processed successfully");
    assert_eq!(body["summary"]["total_rows"], 0);
    assert!(h.sender.calls().is_empty());
}

#[actix_web::test]
async fn test_upload_reports_success_when_notifications_fail() {
    let h = Harness::new(RecordingSender::failing()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let csv = b"name,phone,project\nAlice,+1555000111,SolarRoof\n";
    let req = upload_request(&[("file", Some("leads.csv"), csv.as_slice())]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["summary"]["failed"], 1);
    assert_eq!(body["summary"]["rows"][0]["status"], "notification_failed");

    let leads: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/leads").to_request())
            .await;
    assert_eq!(leads.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_corrupted_store_returns_generic_500() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;
    std::fs::write(h.leads_path(), "not json").unwrap();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/leads").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));

    let csv = b"name,phone,project\nAlice,+1555000111,SolarRoof\n";
    let req = upload_request(&[("file", Some("leads.csv"), csv.as_slice())]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert!(!body["error"].as_str().unwrap().contains("leads.json"));
}

#[actix_web::test]
async fn test_send_reports_delivery() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/send")
        .set_json(json!({ "to": "+1555000111", "message": "Hi there" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "recorded");
    assert_eq!(
        h.sender.calls(),
        vec![("+1555000111".to_string(), "Hi there".to_string())]
    );
}

#[actix_web::test]
async fn test_send_failure_is_client_error() {
    let h = Harness::new(RecordingSender::failing()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/send")
        .set_json(json!({ "to": "+1555000111", "message": "Hi there" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "provider unavailable");
}

#[actix_web::test]
async fn test_send_requires_destination() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/send")
        .set_json(json!({ "message": "Hi there" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(h.sender.calls().is_empty());
}

#[actix_web::test]
async fn test_send_with_malformed_json_returns_error_body() {
    let h = Harness::new(RecordingSender::succeeding()).await;
    let app = test::init_service(App::new().app_data(h.state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/send")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{\"to\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
    assert!(h.sender.calls().is_empty());
}
