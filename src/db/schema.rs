use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    date DATE NOT NULL,
    time TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL,
    category TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

struct SeedEvent {
    title: &'static str,
    description: &'static str,
    date: &'static str,
    time: &'static str,
    location: &'static str,
    category: &'static str,
}

const SEED_EVENTS: [SeedEvent; 6] = [
    SeedEvent {
        title: "Revival Crusade 2025",
        description: "A powerful three-day crusade featuring anointed preaching, worship, and prayer for healing and salvation. Join us for this transformative experience as we seek God's face together.",
        date: "2025-12-15",
        time: "18:00",
        location: "Main Sanctuary",
        category: "crusade",
    },
    SeedEvent {
        title: "Leadership Conference 2025",
        description: "Intensive training for church leaders and ministry workers, focusing on effective leadership and spiritual growth. This conference is designed to equip leaders with practical tools.",
        date: "2025-11-20",
        time: "09:00",
        location: "Conference Hall",
        category: "conference",
    },
    SeedEvent {
        title: "Youth Revival 2025",
        description: "Special event designed for young people, featuring contemporary worship and relevant biblical teaching. This revival is tailored to address the unique challenges facing today's youth.",
        date: "2025-10-10",
        time: "19:00",
        location: "Youth Hall",
        category: "youth",
    },
    SeedEvent {
        title: "Monthly Prayer & Fasting",
        description: "Join us for our monthly prayer and fasting session as we seek God's face together. This is a time of corporate prayer, intercession, and spiritual breakthrough.",
        date: "2025-09-15",
        time: "18:00",
        location: "Prayer Room",
        category: "prayer",
    },
    SeedEvent {
        title: "Sunday Worship Service",
        description: "Join us every Sunday for our worship services featuring powerful preaching, anointed worship, and fellowship. We have two services to accommodate different schedules.",
        date: "2025-09-08",
        time: "09:00",
        location: "Main Sanctuary",
        category: "service",
    },
    SeedEvent {
        title: "Midweek Bible Study",
        description: "Deep dive into God's Word with interactive study sessions and meaningful discussions. Perfect for spiritual growth and fellowship with other believers.",
        date: "2025-09-05",
        time: "19:00",
        location: "Fellowship Hall",
        category: "study",
    },
];

/// Creates the `events` table if needed and seeds it when empty.
///
/// Returns the number of rows seeded, which is zero on every run after the
/// first.
pub async fn init(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    sqlx::query(CREATE_EVENTS_TABLE).execute(pool).await?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        info!(existing = count, "Events table already populated, skipping seed");
        return Ok(0);
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;
    let mut seeded = 0;

    for seed in &SEED_EVENTS {
        seeded += sqlx::query(
            "INSERT INTO events (title, description, date, time, location, category, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(seed.title)
        .bind(seed.description)
        .bind(seed.date)
        .bind(seed.time)
        .bind(seed.location)
        .bind(seed.category)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    info!(seeded, "Seeded sample events");

    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_first_run_seeds_six_events() {
        let pool = connect_in_memory().await.unwrap();
        assert_eq!(init(&pool).await.unwrap(), 6);

        let (date, category): (NaiveDate, String) =
            sqlx::query_as("SELECT date, category FROM events WHERE title = ?")
                .bind("Revival Crusade 2025")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 12, 15).unwrap());
        assert_eq!(category, "crusade");
    }

    #[tokio::test]
    async fn test_second_run_does_not_duplicate() {
        let pool = connect_in_memory().await.unwrap();
        init(&pool).await.unwrap();
        assert_eq!(init(&pool).await.unwrap(), 0);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 6);
    }

    #[tokio::test]
    async fn test_existing_rows_block_seeding() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query(CREATE_EVENTS_TABLE).execute(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO events (title, description, date, location, category)
             VALUES ('Choir practice', 'Weekly rehearsal', '2025-01-04', 'Chapel', 'music')",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert_eq!(init(&pool).await.unwrap(), 0);
    }
}
