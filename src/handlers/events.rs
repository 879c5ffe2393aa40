use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::models::{CreateEventRequest, UpdateEventRequest};
use crate::utils::error::AppResult;
use crate::utils::extract::{EventId, JsonBody, MonthPath};
use crate::utils::response::{created, message, success};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListEventsParams {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingParams {
    /// Kept as text so an unparsable value falls back to the default limit.
    pub limit: Option<String>,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListEventsParams>,
) -> AppResult<impl IntoResponse> {
    let events = state.events.list_all(params.category.as_deref()).await?;
    Ok(success(events))
}

pub async fn list_upcoming_events(
    State(state): State<AppState>,
    Query(params): Query<UpcomingParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.and_then(|l| l.trim().parse::<i64>().ok());
    let events = state.events.list_upcoming(limit).await?;
    Ok(success(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    EventId(id): EventId,
) -> AppResult<impl IntoResponse> {
    let event = state.events.get_by_id(id).await?;
    Ok(success(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateEventRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state.events.create(input).await?;
    Ok(created(id, "Event created successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    EventId(id): EventId,
    JsonBody(input): JsonBody<UpdateEventRequest>,
) -> AppResult<impl IntoResponse> {
    state.events.update(id, input).await?;
    Ok(message("Event updated successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    EventId(id): EventId,
) -> AppResult<impl IntoResponse> {
    state.events.delete(id).await?;
    Ok(message("Event deleted successfully"))
}

pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.events.list_categories().await?;
    Ok(success(categories))
}

pub async fn calendar_events(
    State(state): State<AppState>,
    MonthPath { year, month }: MonthPath,
) -> AppResult<impl IntoResponse> {
    let events = state.events.list_by_month(year, month).await?;
    Ok(success(events))
}
