pub mod auth;
pub mod mascotas;
pub mod usuarios;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use self::auth::ServerState;
use crate::openapi::ApiDoc;

pub const API_BASE: &str = "/api/v1";

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition.
pub async fn metrics() -> (axum::http::StatusCode, String) {
    common::metrics::encode_metrics()
}

fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/Usuario/Login", post(usuarios::login))
        .route("/Usuario/Registrar", post(usuarios::registrar))
        .route("/Usuario/getUsuarioToken", get(usuarios::get_usuario_token))
        .route("/Usuario/RegistrarImagen", put(usuarios::registrar_imagen))
        .route("/Usuario/CambiarImagen", put(usuarios::cambiar_imagen))
        .route("/Mascota/Registrar", post(mascotas::registrar))
        .route("/Mascota/Obtener/MisMascotas", get(mascotas::mis_mascotas))
        .route("/Mascota/Obtener/:codigo_mascota", get(mascotas::obtener))
        .route("/Mascota/Editar/:codigo_mascota", put(mascotas::editar))
        .route("/Mascota/CambiarImagen/:codigo_mascota", put(mascotas::cambiar_imagen))
}

/// Build the full application router: API under `/api/v1`, health, metrics and docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest(API_BASE, api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
