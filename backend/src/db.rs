use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, FromRow, Sqlite, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:workouts.db";

// How long to wait for the connection before reporting storage unavailable
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// One row of the `workouts` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorkoutRow {
    pub date: String,
    pub completed: bool,
    pub message: Option<String>,
}

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self, sqlx::Error> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        // SQLite allows a single writer; one pooled connection keeps
        // concurrent upserts serialized instead of failing with SQLITE_BUSY.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self, sqlx::Error> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self, sqlx::Error> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        // One record per date; the date string is the real key
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL UNIQUE,
                completed INTEGER NOT NULL DEFAULT 0,
                message TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Fetch the records for the given dates in one query. Dates without a
    /// record are simply absent from the returned map.
    pub async fn get_workouts(
        &self,
        dates: &[String],
    ) -> Result<HashMap<String, WorkoutRow>, sqlx::Error> {
        if dates.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; dates.len()].join(", ");
        let sql = format!(
            "SELECT date, completed, message FROM workouts WHERE date IN ({placeholders})"
        );

        let mut query = sqlx::query_as::<_, WorkoutRow>(&sql);
        for date in dates {
            query = query.bind(date);
        }

        let rows = query.fetch_all(&*self.pool).await?;
        Ok(rows.into_iter().map(|row| (row.date.clone(), row)).collect())
    }

    /// Toggle the record for `date`: created as completed when absent, flipped
    /// otherwise. The message is overwritten either way, empty string included.
    ///
    /// A single upsert statement, so two concurrent toggles can never both
    /// observe the same prior state (no lost update).
    pub async fn toggle_workout(
        &self,
        date: &str,
        message: &str,
    ) -> Result<WorkoutRow, sqlx::Error> {
        sqlx::query_as::<_, WorkoutRow>(
            r#"
            INSERT INTO workouts (date, completed, message) VALUES (?, 1, ?)
            ON CONFLICT(date) DO UPDATE
                SET completed = 1 - workouts.completed,
                    message = excluded.message
            RETURNING date, completed, message
            "#,
        )
        .bind(date)
        .bind(message)
        .fetch_one(&*self.pool)
        .await
    }

    /// Store `message` for `date`, creating the record as not-completed when
    /// absent. `completed` is never touched.
    pub async fn save_message(&self, date: &str, message: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO workouts (date, completed, message) VALUES (?, 0, ?)
            ON CONFLICT(date) DO UPDATE SET message = excluded.message
            "#,
        )
        .bind(date)
        .bind(message)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Setup a new test database for each test
    async fn setup_test() -> DbConnection {
        DbConnection::init_test()
            .await
            .expect("Failed to create test database")
    }

    #[tokio::test]
    async fn test_toggle_creates_then_flips() {
        let db = setup_test().await;

        // First toggle creates the record as completed
        let first = db
            .toggle_workout("2025-05-14", "leg day")
            .await
            .expect("Failed to toggle");
        assert!(first.completed);
        assert_eq!(first.message.as_deref(), Some("leg day"));

        // Second toggle flips it back
        let second = db
            .toggle_workout("2025-05-14", "leg day")
            .await
            .expect("Failed to toggle");
        assert!(!second.completed);
    }

    #[tokio::test]
    async fn test_toggle_overwrites_message_even_with_empty_string() {
        let db = setup_test().await;

        db.toggle_workout("2025-05-14", "first note")
            .await
            .expect("Failed to toggle");
        let flipped = db
            .toggle_workout("2025-05-14", "")
            .await
            .expect("Failed to toggle");

        assert_eq!(flipped.message.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_save_message_creates_uncompleted_record() {
        let db = setup_test().await;

        db.save_message("2025-05-14", "rest day")
            .await
            .expect("Failed to save message");

        let rows = db
            .get_workouts(&["2025-05-14".to_string()])
            .await
            .expect("Failed to fetch");
        let row = rows.get("2025-05-14").expect("record exists");
        assert!(!row.completed);
        assert_eq!(row.message.as_deref(), Some("rest day"));
    }

    #[tokio::test]
    async fn test_save_message_preserves_completed() {
        let db = setup_test().await;

        let toggled = db
            .toggle_workout("2025-05-14", "")
            .await
            .expect("Failed to toggle");
        assert!(toggled.completed);

        db.save_message("2025-05-14", "felt great")
            .await
            .expect("Failed to save message");

        let rows = db
            .get_workouts(&["2025-05-14".to_string()])
            .await
            .expect("Failed to fetch");
        let row = rows.get("2025-05-14").expect("record exists");
        assert!(row.completed, "save_message must not change completed");
        assert_eq!(row.message.as_deref(), Some("felt great"));
    }

    #[tokio::test]
    async fn test_save_message_is_idempotent() {
        let db = setup_test().await;

        db.save_message("2025-05-14", "same note")
            .await
            .expect("Failed to save message");
        db.save_message("2025-05-14", "same note")
            .await
            .expect("Failed to save message");

        let rows = db
            .get_workouts(&["2025-05-14".to_string()])
            .await
            .expect("Failed to fetch");
        let row = rows.get("2025-05-14").expect("record exists");
        assert!(!row.completed);
        assert_eq!(row.message.as_deref(), Some("same note"));
    }

    #[tokio::test]
    async fn test_get_workouts_batch_returns_only_existing() {
        let db = setup_test().await;

        db.toggle_workout("2025-05-12", "").await.expect("toggle");
        db.save_message("2025-05-13", "note").await.expect("save");

        let dates: Vec<String> = vec![
            "2025-05-12".to_string(),
            "2025-05-13".to_string(),
            "2025-05-14".to_string(),
        ];
        let rows = db.get_workouts(&dates).await.expect("Failed to fetch");

        assert_eq!(rows.len(), 2);
        assert!(rows.contains_key("2025-05-12"));
        assert!(rows.contains_key("2025-05-13"));
        assert!(!rows.contains_key("2025-05-14"));
    }

    #[tokio::test]
    async fn test_get_workouts_with_no_dates() {
        let db = setup_test().await;

        let rows = db.get_workouts(&[]).await.expect("Failed to fetch");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_toggles_have_no_lost_updates() {
        let db = setup_test().await;

        // Five concurrent toggles on an initially absent date
        let mut handles = Vec::new();
        for _ in 0..5 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.toggle_workout("2025-05-14", "").await
            }));
        }
        for handle in handles {
            handle
                .await
                .expect("task panicked")
                .expect("Failed to toggle");
        }

        // Odd number of toggles ends completed; exactly one record exists
        let rows = db
            .get_workouts(&["2025-05-14".to_string()])
            .await
            .expect("Failed to fetch");
        assert_eq!(rows.len(), 1);
        assert!(rows.get("2025-05-14").expect("record exists").completed);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_even_count_ends_uncompleted() {
        let db = setup_test().await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.toggle_workout("2025-05-15", "").await
            }));
        }
        for handle in handles {
            handle
                .await
                .expect("task panicked")
                .expect("Failed to toggle");
        }

        let rows = db
            .get_workouts(&["2025-05-15".to_string()])
            .await
            .expect("Failed to fetch");
        assert_eq!(rows.len(), 1);
        assert!(!rows.get("2025-05-15").expect("record exists").completed);
    }
}
