//! SQLite durable store

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tokio::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::entities::{ExerciseEvent, User};
use crate::domain::traits::Store;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Durable store backed by a single SQLite database file.
///
/// rusqlite is synchronous; the connection sits behind an async mutex so
/// the Store trait stays non-blocking for callers.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_tables(conn: &Connection) -> Result<(), StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                platform_id INTEGER UNIQUE NOT NULL,
                phone TEXT NOT NULL,
                nickname TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        // One row per logged approach
        conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                count INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_events_user_date ON events(user_id, date)",
            [],
        )?;

        Ok(())
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| StorageError::Serialization(format!("bad date {:?}: {}", raw, e)))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Serialization(format!("bad timestamp {:?}: {}", raw, e)))
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, i64, String, String, String, String)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_user(&self, platform_id: i64) -> Result<Option<User>, StorageError> {
        let conn = self.conn.lock().await;
        let raw = conn
            .query_row(
                "SELECT id, platform_id, phone, nickname, created_at, updated_at
                 FROM users WHERE platform_id = ?1",
                [platform_id],
                row_to_user,
            )
            .optional()?;

        let Some((id, platform_id, phone, nickname, created_at, updated_at)) = raw else {
            return Ok(None);
        };
        Ok(Some(User {
            id,
            platform_id,
            phone,
            nickname,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }

    async fn add_user(&self, user: &User) -> Result<i64, StorageError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (platform_id, phone, nickname, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.platform_id,
                user.phone,
                user.nickname,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn update_user(&self, user: &User) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE users SET nickname = ?1, updated_at = ?2 WHERE platform_id = ?3",
            params![
                user.nickname,
                user.updated_at.to_rfc3339(),
                user.platform_id
            ],
        )?;
        Ok(())
    }

    async fn get_events(&self, user_id: i64) -> Result<Vec<ExerciseEvent>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT user_id, date, count FROM events WHERE user_id = ?1 ORDER BY date, id",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i32>(2)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (user_id, date, count) = row?;
            events.push(ExerciseEvent {
                user_id,
                date: parse_date(&date)?,
                count,
            });
        }
        Ok(events)
    }

    async fn get_events_for_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<ExerciseEvent>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT user_id, date, count FROM events
             WHERE user_id = ?1 AND date = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(
            params![user_id, date.format(DATE_FORMAT).to_string()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i32>(2)?,
                ))
            },
        )?;

        let mut events = Vec::new();
        for row in rows {
            let (user_id, date, count) = row?;
            events.push(ExerciseEvent {
                user_id,
                date: parse_date(&date)?,
                count,
            });
        }
        Ok(events)
    }

    async fn add_event(&self, event: &ExerciseEvent) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO events (user_id, date, count) VALUES (?1, ?2, ?3)",
            params![
                event.user_id,
                event.date.format(DATE_FORMAT).to_string(),
                event.count
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn user_round_trip_assigns_id() {
        let store = SqliteStore::in_memory().unwrap();
        let user = User::new(42, "+123456", "sasha");

        let id = store.add_user(&user).await.unwrap();
        assert!(id > 0);

        let loaded = store.get_user(42).await.unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.phone, "+123456");
        assert_eq!(loaded.nickname, "sasha");

        assert!(store.get_user(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_user_changes_nickname() {
        let store = SqliteStore::in_memory().unwrap();
        let mut user = User::new(42, "+123456", "sasha");
        user.id = store.add_user(&user).await.unwrap();

        user.update_nickname("pasha").unwrap();
        store.update_user(&user).await.unwrap();

        let loaded = store.get_user(42).await.unwrap().unwrap();
        assert_eq!(loaded.nickname, "pasha");
        assert!(loaded.updated_at >= loaded.created_at);
    }

    #[tokio::test]
    async fn events_are_discrete_rows_filtered_by_date() {
        let store = SqliteStore::in_memory().unwrap();
        let monday = date(2025, 3, 10);
        let tuesday = date(2025, 3, 11);

        for (d, count) in [(monday, 15), (monday, 20), (tuesday, 10)] {
            store
                .add_event(&ExerciseEvent::new(1, d, count).unwrap())
                .await
                .unwrap();
        }

        let all = store.get_events(1).await.unwrap();
        assert_eq!(all.len(), 3);

        let on_monday = store.get_events_for_date(1, monday).await.unwrap();
        assert_eq!(on_monday.len(), 2);
        assert_eq!(on_monday.iter().map(|e| e.count).sum::<i32>(), 35);

        assert!(store.get_events(2).await.unwrap().is_empty());
    }
}
