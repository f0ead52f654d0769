//! HTTP health endpoint for the deposit monitor.
//!
//! `GET /health` answers for as long as the process is up, whether or not any
//! chain monitor is running.

use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// ISO-8601 UTC with millisecond precision
    pub timestamp: String,
    pub monitored_chains: Vec<String>,
}

impl HealthResponse {
    pub fn healthy(now: DateTime<Utc>, monitored_chains: Vec<String>) -> Self {
        Self {
            status: "healthy",
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            monitored_chains,
        }
    }
}

/// Shared state for the health handler.
#[derive(Debug, Clone, Default)]
pub struct HealthState {
    monitored_chains: Vec<String>,
}

impl HealthState {
    pub fn new<I, S>(monitored_chains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            monitored_chains: monitored_chains.into_iter().map(Into::into).collect(),
        }
    }

    pub fn monitored_chains(&self) -> &[String] {
        &self.monitored_chains
    }
}

pub async fn health_handler(state: web::Data<HealthState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        Utc::now(),
        state.monitored_chains.clone(),
    ))
}

/// Registers the health route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_handler));
}

/// Any origin may read the health endpoint.
fn cors_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, OPTIONS"))
}

/// Serves the health endpoint on `0.0.0.0:port` until the server stops.
pub async fn serve(state: HealthState, port: u16) -> Result<()> {
    info!(
        port = port,
        monitored_chains = ?state.monitored_chains,
        event = "health_server_starting"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(cors_headers())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use chrono::TimeZone;

    #[::core::prelude::v1::test]
    fn test_health_response_shape() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let response = HealthResponse::healthy(now, vec!["sepolia".into(), "arbitrum".into()]);

        insta::assert_snapshot!(
            serde_json::to_string(&response).unwrap(),
            @r#"{"status":"healthy","timestamp":"2025-01-01T00:00:00.000Z","monitoredChains":["sepolia","arbitrum"]}"#
        );
    }

    #[actix_web::test]
    async fn test_health_endpoint_reports_configured_chains() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(HealthState::new(["arbitrum"])))
                .wrap(cors_headers())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["monitoredChains"], serde_json::json!(["arbitrum"]));

        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert!(timestamp.ends_with('Z'));
    }

    #[actix_web::test]
    async fn test_health_endpoint_with_no_chains() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(HealthState::default()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["monitoredChains"], serde_json::json!([]));
    }
}
