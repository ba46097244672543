use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use http::StatusCode;
use tracing::{debug, info};

use crate::{
    models::recommendation::recommend,
    utils::{fan_out::FanOutResult, state::AppState},
};

pub fn cache_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

pub async fn get_recommendation(State(state): State<Arc<AppState>>) -> Response {
    let today = Utc::now().date_naive();
    let key = cache_key(today);

    // An empty cached value counts as a miss.
    if let Some(body) = state.cache.get(&key).filter(|body| !body.is_empty()) {
        debug!("cache hit for {}", key);
        state.telemetry.cache_hit();
        return (StatusCode::OK, body).into_response();
    }
    state.telemetry.cache_miss();

    match state.coordinator.run(today).await {
        Ok(FanOutResult { today, past_week }) => {
            let body = recommend(&today, &past_week).to_string();
            info!("recommendation for {}: {}", key, body);
            state.cache.set(&key, body.clone(), state.config.cache_ttl);
            (StatusCode::OK, body).into_response()
        }
        Err(err) => {
            state.telemetry.fetch_error(err.class);
            state.telemetry.log(&err.to_string());
            err.into_response()
        }
    }
}
