//! HTTP API
//!
//! - `GET /api/lecturas?fecha=YYYY-MM-DD` (fecha optional, defaults to today)
//! - `GET /api/lecturas/{fecha}`
//! - `GET /api/health`
//! - `GET /api/help`
//!
//! Readings endpoints answer with the result envelope: 200 on success and
//! 404 when the envelope reports a failure.

use crate::date::today;
use crate::readings::{ReadingsService, ResultEnvelope};
use actix_web::{get, middleware, web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LecturasQuery {
    fecha: Option<String>,
}

#[get("/api/lecturas")]
async fn lecturas_by_query(
    service: web::Data<ReadingsService>,
    query: web::Query<LecturasQuery>,
) -> HttpResponse {
    let fecha = query
        .into_inner()
        .fecha
        .filter(|fecha| !fecha.trim().is_empty())
        .unwrap_or_else(today);

    envelope_response(service.get_readings(&fecha).await)
}

#[get("/api/lecturas/{fecha}")]
async fn lecturas_by_path(
    service: web::Data<ReadingsService>,
    fecha: web::Path<String>,
) -> HttpResponse {
    envelope_response(service.get_readings(&fecha).await)
}

#[get("/api/health")]
async fn health() -> impl Responder {
    web::Json(serde_json::json!({ "status": "ok" }))
}

#[get("/api/help")]
async fn help() -> impl Responder {
    web::Json(serde_json::json!({
        "nombre": "API Evangelio del Día",
        "descripcion": "Extrae las lecturas del día desde Vatican News",
        "endpoints": {
            "lecturas": {
                "url": "/api/lecturas",
                "metodo": "GET",
                "parametros": {
                    "fecha": "Opcional. Formato: YYYY-MM-DD. Si no se proporciona, usa la fecha actual."
                },
                "ejemplo": "GET /api/lecturas?fecha=2025-12-03"
            },
            "lecturasPorRuta": {
                "url": "/api/lecturas/{fecha}",
                "metodo": "GET",
                "ejemplo": "GET /api/lecturas/2025-12-03"
            },
            "health": {
                "url": "/api/health",
                "metodo": "GET",
                "descripcion": "Verifica que el servidor está activo"
            }
        }
    }))
}

fn envelope_response(envelope: ResultEnvelope) -> HttpResponse {
    if envelope.is_success() {
        HttpResponse::Ok().json(envelope)
    } else {
        HttpResponse::NotFound().json(envelope)
    }
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(lecturas_by_query)
        .service(lecturas_by_path)
        .service(health)
        .service(help);
}

/// Runs the HTTP API until the process is stopped
pub async fn serve(service: ReadingsService, bind: &str) -> std::io::Result<()> {
    let data = web::Data::new(service);

    tracing::info!("Readings API listening on {}", bind);
    tracing::info!("Usage help at http://{}/api/help", bind);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
