use axum::{extract::State, response::IntoResponse};
use serde::Serialize;

use crate::utils::error::AppResult;
use crate::utils::response::success;
use crate::AppState;

pub mod events;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    database: &'static str,
    events: i64,
}

pub async fn health_check(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let events = state.events.count().await?;

    let payload = HealthPayload {
        status: "ok",
        service: "rcmi-events-api",
        database: "ok",
        events,
    };

    Ok(success(payload))
}
