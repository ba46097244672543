use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use http::{header, StatusCode};
use prometheus::{Encoder, TextEncoder};
use tracing::warn;

use crate::utils::state::AppState;

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

// Nothing external to wait on, so ready as soon as the listener is up.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&state.registry.gather(), &mut buffer) {
        warn!("failed to encode metrics: {:?}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}
