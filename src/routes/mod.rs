use axum::{routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, Config};
use crate::handlers::events::{
    calendar_events, create_event, delete_event, get_event, list_categories, list_events,
    list_upcoming_events, update_event,
};
use crate::handlers::health_check;
use crate::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/upcoming", get(list_upcoming_events))
        .route("/events/categories", get(list_categories))
        .route("/events/calendar/:year/:month", get(calendar_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
        .with_state(state)
}
