//! End-to-end readings retrieval through the direct transport

use crate::common::{mock_config, BASE_PATH, READINGS_PAGE};
use lecturas::readings::{ReadingsResult, ReadingsService, ResultEnvelope};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_readings_page() {
    let mock_server = MockServer::start().await;
    let page_path = format!("{}/2025/12/04.html", BASE_PATH);
    mount_page(&mock_server, &page_path, 200, READINGS_PAGE).await;

    let service = ReadingsService::from_config(&mock_config(&mock_server)).unwrap();
    let envelope = service.get_readings("2025-12-03").await;

    let success = match envelope {
        ResultEnvelope::Success(success) => success,
        ResultEnvelope::Failure(failure) => panic!("expected success, got {}", failure.error),
    };

    assert_eq!(success.fecha, "2025-12-03");
    assert_eq!(success.url, format!("{}{}", mock_server.uri(), page_path));

    let lecturas = success.lecturas;
    assert_eq!(
        lecturas.indicacion_liturgica.as_deref(),
        Some("Miércoles de la I semana de Adviento")
    );
    assert_eq!(lecturas.primera_lectura.cita.as_deref(), Some("Isaías 25, 6-10"));
    let primera = lecturas.primera_lectura.lectura.unwrap();
    assert!(primera.starts_with("En aquel día"));
    assert!(primera.ends_with("festín de manjares suculentos. Aniquilará la muerte para siempre."));

    assert_eq!(lecturas.evangelio.cita.as_deref(), Some("Mateo 15, 29-37"));
    assert_eq!(
        lecturas.evangelio.lectura.as_deref(),
        Some("En aquel tiempo, Jesús, bordeando el mar de Galilea, subió al monte.")
    );
}

#[tokio::test]
async fn test_zero_offset_requests_same_day() {
    let mock_server = MockServer::start().await;
    let page_path = format!("{}/2025/12/03.html", BASE_PATH);
    mount_page(&mock_server, &page_path, 200, READINGS_PAGE).await;

    let mut config = mock_config(&mock_server);
    config.source.day_offset = 0;
    let service = ReadingsService::from_config(&config).unwrap();

    let envelope = service.get_readings("2025-12-03").await;
    assert!(envelope.is_success(), "{:?}", envelope);
}

#[tokio::test]
async fn test_page_without_readings_is_still_success() {
    let mock_server = MockServer::start().await;
    let page_path = format!("{}/2026/01/01.html", BASE_PATH);
    mount_page(
        &mock_server,
        &page_path,
        200,
        "<html><body><p>Página en mantenimiento</p></body></html>",
    )
    .await;

    let service = ReadingsService::from_config(&mock_config(&mock_server)).unwrap();
    let envelope = service.get_readings("2025-12-31").await;

    assert!(envelope.is_success());
    assert_eq!(envelope.lecturas(), Some(&ReadingsResult::default()));

    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(
        value["lecturas"],
        json!({
            "indicacionLiturgica": null,
            "primeraLectura": { "cita": null, "lectura": null },
            "evangelio": { "cita": null, "lectura": null }
        })
    );
}

#[tokio::test]
async fn test_server_error_becomes_failure_envelope() {
    let mock_server = MockServer::start().await;
    let page_path = format!("{}/2025/12/04.html", BASE_PATH);
    mount_page(&mock_server, &page_path, 500, "boom").await;

    let service = ReadingsService::from_config(&mock_config(&mock_server)).unwrap();
    let envelope = service.get_readings("2025-12-03").await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.fecha(), "2025-12-03");
    assert!(envelope.error().unwrap().contains("500"));

    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["success"], json!(false));
    assert!(value.get("url").is_none());
}

#[tokio::test]
async fn test_invalid_date_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = ReadingsService::from_config(&mock_config(&mock_server)).unwrap();
    let envelope = service.get_readings("not-a-date").await;

    assert_eq!(
        envelope,
        ResultEnvelope::failure("not-a-date", "Invalid date format 'not-a-date'. Use YYYY-MM-DD")
    );
}

#[tokio::test]
async fn test_unreachable_host_becomes_failure_envelope() {
    // Non-pooled server so dropping it actually closes the port
    let mock_server = MockServer::builder().start().await;
    let config = mock_config(&mock_server);
    drop(mock_server);

    let service = ReadingsService::from_config(&config).unwrap();
    let envelope = service.get_readings("2025-12-03").await;

    assert!(!envelope.is_success());
    assert!(envelope.error().unwrap().starts_with("HTTP error for"));
}
