pub mod events;

pub use events::{month_range, EventService, DEFAULT_UPCOMING_LIMIT};
