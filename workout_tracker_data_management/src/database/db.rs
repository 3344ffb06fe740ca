use std::path::PathBuf;

use const_format::concatcp;
use sqlx::{query, sqlite::SqliteConnectOptions, Executor, Pool, Row, Sqlite, SqlitePool};
use workout_tracker_lib::workout::Workout;

use crate::{DataManagerError, DATABASE_PATH};

use super::constants::*;

/// Key/value storage backed by SQLite. The whole workout list is one JSON
/// value under a fixed key, overwritten on every save.
#[derive(Clone)]
pub struct WorkoutDatabase {
    pool: Pool<Sqlite>,
}

impl WorkoutDatabase {
    pub async fn connect() -> Result<Self, DataManagerError> {
        let root: PathBuf = project_root::get_project_root()
            .map_err(|_| DataManagerError::Database("Failed to locate project root".to_string()))?;
        let options = SqliteConnectOptions::new()
            .filename(root.join(DATABASE_PATH))
            .create_if_missing(true);

        Self::connect_with(options).await
    }

    pub async fn connect_with(options: SqliteConnectOptions) -> Result<Self, DataManagerError> {
        let pool = SqlitePool::connect_with(options).await
            .map_err(|_| DataManagerError::Database("Failed to connect to database".to_string()))?;

        let db = Self {
            pool
        };

        db.init().await?;

        Ok(db)
    }

    async fn init(&self) -> Result<(), DataManagerError> {
        self.pool.execute(concatcp!("
            CREATE TABLE IF NOT EXISTS ", STORAGE_TABLE_NAME, "(",
                KEY,   " TEXT PRIMARY KEY,",
                VALUE, " TEXT NOT NULL)")).await
            .map_err(|_| DataManagerError::Database("Failed to create storage table".to_string()))
            .map(|_| ())
    }

    pub async fn save_workouts(&self, workouts: &[Workout]) -> Result<(), DataManagerError> {
        let value = serde_json::to_string(workouts)
            .map_err(|_| DataManagerError::Database("Failed to serialize workouts".to_string()))?;

        query(concatcp!("INSERT OR REPLACE INTO ", STORAGE_TABLE_NAME, "(", KEY, ", ", VALUE, ") VALUES (?1, ?2)"))
            .bind(WORKOUTS_KEY)
            .bind(value)
            .execute(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to store workouts".to_string()))
            .map(|_| ())
    }

    /// A missing entry or one that no longer parses is not an error, the
    /// list just starts over empty.
    pub async fn load_workouts(&self) -> Result<Vec<Workout>, DataManagerError> {
        let row = query(concatcp!("SELECT ", VALUE, " FROM ", STORAGE_TABLE_NAME, " WHERE ", KEY, " = ?1"))
            .bind(WORKOUTS_KEY)
            .fetch_optional(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to read workouts".to_string()))?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let value: String = row.get(0);
        match serde_json::from_str(&value) {
            Ok(workouts) => Ok(workouts),
            Err(err) => {
                tracing::warn!("Discarding unreadable stored workouts: {err}");
                Ok(Vec::new())
            }
        }
    }

    pub async fn clear_workouts(&self) -> Result<(), DataManagerError> {
        query(concatcp!("DELETE FROM ", STORAGE_TABLE_NAME, " WHERE ", KEY, " = ?1"))
            .bind(WORKOUTS_KEY)
            .execute(&self.pool).await
            .map_err(|_| DataManagerError::Database("Failed to clear workouts".to_string()))
            .map(|_| ())
    }
}

#[cfg(test)]
pub(crate) async fn temp_database() -> (WorkoutDatabase, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("database.db"))
        .create_if_missing(true);

    (WorkoutDatabase::connect_with(options).await.unwrap(), dir)
}

#[cfg(test)]
fn sample_workouts() -> Vec<Workout> {
    use chrono::{TimeZone, Utc};
    use geo_types::Point;
    use workout_tracker_lib::{cycling::Cycling, running::Running};

    let timestamp = Utc.with_ymd_and_hms(2026, 8, 6, 17, 30, 0).unwrap();
    vec![
        Workout::Running(Running::new(Point::new(-74.0, 40.7), 5.2, 24.0, 178, timestamp).unwrap()),
        Workout::Cycling(Cycling::new(Point::new(10.2, 56.1), 20.0, 60.0, 400.0, timestamp).unwrap()),
    ]
}

#[tokio::test]
async fn save_and_load_round_trip() {
    let (db, _dir) = temp_database().await;
    let workouts = sample_workouts();

    db.save_workouts(&workouts).await.unwrap();
    let loaded = db.load_workouts().await.unwrap();

    assert_eq!(loaded, workouts);
}

#[tokio::test]
async fn load_without_stored_entry_is_empty() {
    let (db, _dir) = temp_database().await;

    assert!(db.load_workouts().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_entry_loads_as_empty() {
    let (db, _dir) = temp_database().await;

    query(concatcp!("INSERT OR REPLACE INTO ", STORAGE_TABLE_NAME, "(", KEY, ", ", VALUE, ") VALUES (?1, ?2)"))
        .bind(WORKOUTS_KEY)
        .bind("not json at all")
        .execute(&db.pool).await.unwrap();

    assert!(db.load_workouts().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_overwrites_the_previous_entry() {
    let (db, _dir) = temp_database().await;
    let workouts = sample_workouts();

    db.save_workouts(&workouts).await.unwrap();
    db.save_workouts(&workouts[..1]).await.unwrap();

    assert_eq!(db.load_workouts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn clear_removes_the_entry() {
    let (db, _dir) = temp_database().await;

    db.save_workouts(&sample_workouts()).await.unwrap();
    db.clear_workouts().await.unwrap();

    assert!(db.load_workouts().await.unwrap().is_empty());
}
