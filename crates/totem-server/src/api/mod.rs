mod lookup;

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use totem_lookup::{LookupError, LookupResolver};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::middleware::request_id;

/// Sent on every response; kiosk browsers must never show stale stock or prices.
pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

const MSG_MISSING_BARCODE: &str = "Falta 'barcode'";
const MSG_NOT_FOUND: &str = "Producto no encontrado";
const MSG_VARIANT_SEARCH_FAILED: &str = "Error al consultar variantes";
const MSG_INTERNAL: &str = "Error interno";

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<LookupResolver>,
}

/// Error response: `{"error": "<message>"}` with the matching status code.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: &'static str,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    fn new(status: StatusCode, error: &'static str) -> Self {
        Self { status, error }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
    }

    /// Maps a lookup failure to its HTTP response, logging server-side ones.
    pub fn from_lookup(request_id: &str, error: &LookupError) -> Self {
        match error {
            LookupError::InvalidInput => Self::new(StatusCode::BAD_REQUEST, MSG_MISSING_BARCODE),
            LookupError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, MSG_NOT_FOUND),
            LookupError::UpstreamUnavailable(_) => {
                tracing::error!(request_id, %error, "variant search failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, MSG_VARIANT_SEARCH_FAILED)
            }
            LookupError::Internal(_) => {
                tracing::error!(request_id, %error, "lookup failed unexpectedly");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

/// Turns a handler panic into the generic internal-error body.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(detail, "handler panicked");
    ApiError::internal().into_response()
}

pub fn build_app(state: AppState, public_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/lookup", get(lookup::lookup_product));

    Router::new()
        .merge(api_routes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static(NO_CACHE),
                ))
                .layer(build_cors())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}
