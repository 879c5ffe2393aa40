use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, info, instrument};

use crate::db::EventStore;
use crate::models::{CalendarEvent, CreateEventRequest, Event, NewEvent, UpdateEventRequest};
use crate::utils::error::{AppError, AppResult};

pub const DEFAULT_UPCOMING_LIMIT: i64 = 10;

/// Category value that means "no filter".
const ALL_CATEGORIES: &str = "all";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug)]
pub struct EventService {
    store: EventStore,
}

impl EventService {
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self, category: Option<&str>) -> AppResult<Vec<Event>> {
        let category = category.filter(|c| *c != ALL_CATEGORIES);
        let events = self.store.fetch_all(category).await?;
        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    /// Events from today (server-local date) onwards. `limit` is handed to
    /// the store unchanged.
    #[instrument(skip(self))]
    pub async fn list_upcoming(&self, limit: Option<i64>) -> AppResult<Vec<Event>> {
        let today = Local::now().date_naive();
        let limit = limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
        Ok(self.store.fetch_from(today, limit).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> AppResult<Event> {
        self.store
            .fetch_by_id(id)
            .await?
            .ok_or_else(AppError::event_not_found)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateEventRequest) -> AppResult<i64> {
        let event = validate_new_event(input)?;
        let id = self.store.insert(&event, Utc::now()).await?;
        info!(id, title = %event.title, "Event created");
        Ok(id)
    }

    /// Applies the fields present in `input` on top of the stored row.
    ///
    /// The existence check and the write are separate statements; a row
    /// deleted in between surfaces as NotFound.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: UpdateEventRequest) -> AppResult<()> {
        let existing = self.get_by_id(id).await?;
        let updated = apply_changes(existing, input)?;

        if self.store.update(&updated).await? == 0 {
            return Err(AppError::event_not_found());
        }

        info!(id, "Event updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get_by_id(id).await?;

        if self.store.delete(id).await? == 0 {
            return Err(AppError::event_not_found());
        }

        info!(id, "Event deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        Ok(self.store.distinct_categories().await?)
    }

    #[instrument(skip(self))]
    pub async fn list_by_month(&self, year: i32, month: u32) -> AppResult<Vec<CalendarEvent>> {
        let (first, last) = month_range(year, month)?;
        let events = self.store.fetch_between(first, last).await?;
        Ok(events.into_iter().map(CalendarEvent::from).collect())
    }

    /// Row count; doubles as a store round-trip for health checks.
    pub async fn count(&self) -> AppResult<i64> {
        Ok(self.store.count().await?)
    }
}

/// First and last calendar day of `month` in `year`.
pub fn month_range(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::ValidationError(format!("Invalid year/month: {}/{}", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(invalid)?;

    Ok((first, last))
}

fn validate_new_event(input: CreateEventRequest) -> AppResult<NewEvent> {
    // Presence is checked for every field, in this order, before any parsing.
    let title = required("title", input.title)?;
    let description = required("description", input.description)?;
    let date = required("date", input.date)?;
    let location = required("location", input.location)?;
    let category = required("category", input.category)?;

    Ok(NewEvent {
        title,
        description,
        date: parse_date(&date)?,
        time: input.time.unwrap_or_default(),
        location,
        category,
    })
}

fn apply_changes(mut event: Event, input: UpdateEventRequest) -> AppResult<Event> {
    if let Some(title) = input.title {
        event.title = non_blank("title", title)?;
    }
    if let Some(description) = input.description {
        event.description = non_blank("description", description)?;
    }
    if let Some(date) = input.date {
        event.date = parse_date(&date)?;
    }
    if let Some(time) = input.time {
        event.time = time;
    }
    if let Some(location) = input.location {
        event.location = non_blank("location", location)?;
    }
    if let Some(category) = input.category {
        event.category = non_blank("category", category)?;
    }

    event.updated_at = Utc::now().max(event.updated_at);
    Ok(event)
}

fn required(field: &str, value: Option<String>) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::missing_field(field)),
    }
}

fn non_blank(field: &str, value: String) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!(
            "Field must not be empty: {}",
            field
        )));
    }
    Ok(value)
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AppError::ValidationError(format!("Invalid date: {} (expected YYYY-MM-DD)", value))
    })
}
