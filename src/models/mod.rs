pub mod event;

pub use event::{CalendarEvent, CreateEventRequest, Event, NewEvent, UpdateEventRequest};
