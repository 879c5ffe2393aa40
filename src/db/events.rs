use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::models::{Event, NewEvent};

const SELECT_EVENTS: &str = "SELECT id, title, description, date, time, location, category, created_at, updated_at FROM events";

/// Parameterized SQL over the `events` table.
///
/// Every call borrows one pooled connection for a single statement; the
/// connection goes back to the pool when the call returns, on error paths
/// too. Writes run in autocommit mode.
#[derive(Clone, Debug)]
pub struct EventStore {
    pool: SqlitePool,
}

impl EventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn fetch_all(&self, category: Option<&str>) -> Result<Vec<Event>, sqlx::Error> {
        match category {
            Some(category) => {
                sqlx::query_as::<_, Event>(&format!(
                    "{SELECT_EVENTS} WHERE category = ? ORDER BY date ASC, id ASC"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Event>(&format!("{SELECT_EVENTS} ORDER BY date ASC, id ASC"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
    }

    /// Events on or after `from`, at most `limit` rows. A negative limit
    /// lifts the cap.
    pub async fn fetch_from(&self, from: NaiveDate, limit: i64) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            "{SELECT_EVENTS} WHERE date >= ? ORDER BY date ASC, id ASC LIMIT ?"
        ))
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Events dated within `[first, last]`, both ends inclusive.
    pub async fn fetch_between(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            "{SELECT_EVENTS} WHERE date >= ? AND date <= ? ORDER BY date ASC, id ASC"
        ))
        .bind(first)
        .bind(last)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!("{SELECT_EVENTS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Inserts `event` with both timestamps set to `now` and returns its id.
    pub async fn insert(&self, event: &NewEvent, now: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO events (title, description, date, time, location, category, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.category)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Writes every updatable column of `event`, keyed by its id. `created_at`
    /// is never touched. Returns the number of rows changed.
    pub async fn update(&self, event: &Event) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE events
             SET title = ?, description = ?, date = ?, time = ?, location = ?, category = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.category)
        .bind(event.updated_at)
        .bind(event.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn distinct_categories(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM events ORDER BY category ASC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect_in_memory, schema};

    async fn empty_store() -> EventStore {
        let pool = connect_in_memory().await.unwrap();
        schema::init(&pool).await.unwrap();
        sqlx::query("DELETE FROM events").execute(&pool).await.unwrap();
        EventStore::new(pool)
    }

    fn new_event(title: &str, date: &str, category: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: format!("{title} description"),
            date: date.parse().unwrap(),
            time: String::new(),
            location: "Main Sanctuary".to_string(),
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_fetch_by_id() {
        let store = empty_store().await;
        let now = Utc::now();
        let id = store
            .insert(&new_event("Vigil", "2025-03-01", "prayer"), now)
            .await
            .unwrap();

        let event = store.fetch_by_id(id).await.unwrap().unwrap();
        assert_eq!(event.id, id);
        assert_eq!(event.title, "Vigil");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(event.created_at, event.updated_at);
        assert!((event.created_at - now).num_milliseconds().abs() < 1);
    }

    #[tokio::test]
    async fn test_fetch_all_orders_by_date_and_filters_exactly() {
        let store = empty_store().await;
        let now = Utc::now();
        store.insert(&new_event("B", "2025-05-02", "youth"), now).await.unwrap();
        store.insert(&new_event("A", "2025-05-01", "Youth"), now).await.unwrap();
        store.insert(&new_event("C", "2025-05-03", "youth"), now).await.unwrap();

        let titles: Vec<String> = store
            .fetch_all(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["A", "B", "C"]);

        let youth = store.fetch_all(Some("youth")).await.unwrap();
        assert_eq!(youth.len(), 2);
        assert!(youth.iter().all(|e| e.category == "youth"));

        assert!(store.fetch_all(Some("yo")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_from_respects_limit() {
        let store = empty_store().await;
        let now = Utc::now();
        for day in 1..=5 {
            store
                .insert(&new_event(&format!("Day {day}"), &format!("2025-06-0{day}"), "service"), now)
                .await
                .unwrap();
        }
        let from = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        let limited = store.fetch_from(from, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].title, "Day 2");

        let unlimited = store.fetch_from(from, -1).await.unwrap();
        assert_eq!(unlimited.len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_between_is_inclusive() {
        let store = empty_store().await;
        let now = Utc::now();
        store.insert(&new_event("Before", "2025-08-31", "study"), now).await.unwrap();
        store.insert(&new_event("First", "2025-09-01", "study"), now).await.unwrap();
        store.insert(&new_event("Last", "2025-09-30", "study"), now).await.unwrap();
        store.insert(&new_event("After", "2025-10-01", "study"), now).await.unwrap();

        let titles: Vec<String> = store
            .fetch_between(
                NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            )
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["First", "Last"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_rows() {
        let store = empty_store().await;
        let id = store
            .insert(&new_event("Picnic", "2025-07-04", "fellowship"), Utc::now())
            .await
            .unwrap();

        let mut event = store.fetch_by_id(id).await.unwrap().unwrap();
        event.location = "Park".to_string();
        assert_eq!(store.update(&event).await.unwrap(), 1);
        assert_eq!(store.fetch_by_id(id).await.unwrap().unwrap().location, "Park");

        assert_eq!(store.delete(id).await.unwrap(), 1);
        assert_eq!(store.delete(id).await.unwrap(), 0);
        assert!(store.fetch_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = empty_store().await;
        let now = Utc::now();
        let first = store.insert(&new_event("One", "2025-01-01", "service"), now).await.unwrap();
        store.delete(first).await.unwrap();
        let second = store.insert(&new_event("Two", "2025-01-02", "service"), now).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_distinct_categories_sorted() {
        let store = empty_store().await;
        assert!(store.distinct_categories().await.unwrap().is_empty());

        let now = Utc::now();
        store.insert(&new_event("A", "2025-01-01", "youth"), now).await.unwrap();
        store.insert(&new_event("B", "2025-01-02", "crusade"), now).await.unwrap();
        store.insert(&new_event("C", "2025-01-03", "youth"), now).await.unwrap();

        assert_eq!(store.distinct_categories().await.unwrap(), ["crusade", "youth"]);
        assert_eq!(store.count().await.unwrap(), 3);
    }
}
