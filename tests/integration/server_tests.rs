//! HTTP API routes

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use lecturas::config::{FetchMode, SourceConfig};
use lecturas::fetch::Transport;
use lecturas::readings::ReadingsService;
use lecturas::server::configure;
use lecturas::ReadingsError;
use serde_json::Value;
use std::sync::{Arc, Mutex};

const PAGE: &str = r#"<section class="section--evidence"><h2>Evangelio del Día</h2>
    <p>Lectura del santo evangelio según san Lucas</p><p>Lucas 10, 21-24</p><p>En aquella hora...</p></section>"#;

/// Serves a fixed page and records the requested URLs
#[derive(Default)]
struct RecordingTransport {
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn fetch(&self, url: &str) -> Result<String, ReadingsError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(PAGE.to_string())
    }

    fn mode(&self) -> FetchMode {
        FetchMode::Direct
    }
}

fn service() -> (ReadingsService, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    (
        ReadingsService::new(SourceConfig::default(), transport.clone()),
        transport,
    )
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(App::new().configure(configure)).await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_help_lists_endpoints() {
    let app = test::init_service(App::new().configure(configure)).await;
    let req = test::TestRequest::get().uri("/api/help").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["endpoints"]["lecturas"]["url"], "/api/lecturas");
}

#[actix_web::test]
async fn test_lecturas_by_query() {
    let (service, transport) = service();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/lecturas?fecha=2025-12-01")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["fecha"], "2025-12-01");
    assert_eq!(body["lecturas"]["evangelio"]["cita"], "Lucas 10, 21-24");

    assert_eq!(
        transport.urls.lock().unwrap().as_slice(),
        ["https://www.vaticannews.va/es/evangelio-de-hoy/2025/12/02.html"]
    );
}

#[actix_web::test]
async fn test_lecturas_by_path() {
    let (service, _) = service();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/lecturas/2025-12-01").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["lecturas"]["evangelio"]["lectura"], "En aquella hora...");
}

#[actix_web::test]
async fn test_lecturas_without_date_uses_today() {
    let (service, transport) = service();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/lecturas").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fecha"], lecturas::date::today());
    assert_eq!(transport.urls.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_invalid_date_is_not_found() {
    let (service, transport) = service();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/lecturas/ayer").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["fecha"], "ayer");
    assert!(body["error"].as_str().unwrap().contains("YYYY-MM-DD"));
    assert!(transport.urls.lock().unwrap().is_empty());
}
