pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use services::EventService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
}

impl AppState {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            events: EventService::new(db::EventStore::new(pool)),
        }
    }
}
