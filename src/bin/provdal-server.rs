//! provdal HTTP service.
//!
//! Serves a provenance dataset over the DAL-style query surface:
//!
//! - `GET /provdal` — lineage query (`ID`, `DEPTH`, `DIRECTION`,
//!   `RESPONSEFORMAT`, `MODEL`, `MEMBERS`, `STEPS`, `AGENT`)
//! - `GET /prov/{format}` — whole-store dump as `PROV-N` or `PROV-JSON`
//! - `GET /health` — service status
//!
//! Build and run: `cargo run --features server --bin provdal-server`

use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use url::form_urlencoded;

use provdal::config::ProvDalConfig;
use provdal::error::{ProvError, QueryError};
use provdal::query::resolve;
use provdal::render::{OutputFormat, Rendered};
use provdal::store::ProvStore;

// ── Server state ──────────────────────────────────────────────────────────

struct ServerState {
    store: ProvStore,
    config: ProvDalConfig,
}

// ── Response types ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    nodes: usize,
    relations: usize,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        nodes: state.store.node_count(),
        relations: state.store.relation_count(),
    })
}

fn error_response(err: &QueryError) -> Response {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
    let body = if status == StatusCode::BAD_REQUEST {
        format!("Bad request: {err}.")
    } else {
        format!("{err}")
    };
    (status, body).into_response()
}

fn rendered_response(rendered: Rendered) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, format!("{}; charset=utf-8", rendered.media_type))],
        rendered.body,
    )
        .into_response()
}

async fn provdal_query(
    State(state): State<Arc<ServerState>>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
) -> Response {
    let raw = raw.unwrap_or_default();
    let params: Vec<(String, String)> = form_urlencoded::parse(raw.as_bytes())
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    let accept = headers.get(ACCEPT).and_then(|value| value.to_str().ok());

    let query = match resolve(&params, accept) {
        Ok(query) => query,
        Err(err) => return error_response(&err),
    };

    tracing::info!(
        ids = ?query.ids,
        depth = ?query.depth,
        direction = ?query.direction,
        format = query.format.name(),
        "provdal query"
    );

    match provdal::run_query(&state.store, &query, &state.config.namespaces) {
        Ok(rendered) => rendered_response(rendered),
        Err(ProvError::Query(err)) => error_response(&err),
        Err(err) => {
            tracing::error!("query failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{err}")).into_response()
        }
    }
}

async fn full_dump(
    State(state): State<Arc<ServerState>>,
    Path(format): Path<String>,
) -> Response {
    let format = match format.to_uppercase().as_str() {
        "PROV-N" => OutputFormat::ProvN,
        "PROV-JSON" => OutputFormat::ProvJson,
        other => {
            return error_response(&QueryError::UnsupportedFormat { format: other.to_string() })
        }
    };

    match provdal::run_full_dump(&state.store, format, &state.config.namespaces) {
        Ok(rendered) => rendered_response(rendered),
        Err(err) => {
            tracing::error!("full dump failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{err}")).into_response()
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("PROVDAL_CONFIG") {
        Ok(path) => ProvDalConfig::load(std::path::Path::new(&path)).unwrap_or_else(|e| {
            tracing::error!("failed to load config {path}: {e}");
            std::process::exit(1);
        }),
        Err(_) => ProvDalConfig::default(),
    };

    let dataset = std::env::var("PROVDAL_DATASET")
        .map(std::path::PathBuf::from)
        .ok()
        .or_else(|| config.dataset.clone())
        .unwrap_or_else(|| {
            tracing::error!("no dataset configured; set PROVDAL_DATASET or the config file");
            std::process::exit(1);
        });

    let store = ProvStore::from_json_file(&dataset).unwrap_or_else(|e| {
        tracing::error!("failed to load dataset {}: {e}", dataset.display());
        std::process::exit(1);
    });

    tracing::info!(
        dataset = %dataset.display(),
        nodes = store.node_count(),
        relations = store.relation_count(),
        "provenance store loaded"
    );

    let addr = format!("{}:{}", config.bind, config.port);
    let state = Arc::new(ServerState { store, config });

    let app = Router::new()
        .route("/health", get(health))
        .route("/provdal", get(provdal_query))
        .route("/prov/{format}", get(full_dump))
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("provdal server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
