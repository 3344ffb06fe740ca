use std::{path::PathBuf, sync::Arc};

use chrono::Utc;
use geo_types::Point;
use tokio::sync::Mutex;
use workout_tracker_lib::{
    cycling::Cycling,
    running::Running,
    workout::{ValidationError, Workout, WorkoutKind},
};

use crate::{database::db::WorkoutDatabase, DataManagerError, DATA_DIR};

/// Entry state of the tracker. A map click opens a pending entry, a
/// successful submission closes it again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryState {
    Idle,
    AwaitingDetails { position: Point },
}

#[derive(Clone)]
pub struct WorkoutManager {
    pub(crate) database: WorkoutDatabase,
    workouts: Arc<Mutex<Vec<Workout>>>,
    entry: Arc<Mutex<EntryState>>,
}

/// The public interface for all workout tracker data management.
impl WorkoutManager {
    pub async fn start() -> Result<Self, DataManagerError> {
        // Create data dir if it doesn't exist
        let root: PathBuf = project_root::get_project_root()
            .map_err(|_| DataManagerError::Database("Failed to locate project root".to_string()))?;
        let data_dir = root.join(DATA_DIR);
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)
                .map_err(|_| DataManagerError::Database(format!("Failed to create data directory: {:?}", data_dir)))?;
        }

        let database = WorkoutDatabase::connect().await?;

        Self::with_database(database).await
    }

    /// Rehydrates the stored workout list and starts idle.
    pub async fn with_database(database: WorkoutDatabase) -> Result<Self, DataManagerError> {
        let workouts = database.load_workouts().await?;
        tracing::debug!("Restored {} stored workouts", workouts.len());

        Ok(WorkoutManager {
            database,
            workouts: Arc::new(Mutex::new(workouts)),
            entry: Arc::new(Mutex::new(EntryState::Idle)),
        })
    }

    /// Captures the clicked position and waits for the workout details.
    /// Another click before submission just moves the pending entry.
    pub async fn begin_entry(&self, position: Point) {
        let mut entry = self.entry.lock().await;
        *entry = EntryState::AwaitingDetails { position };
    }

    pub async fn entry_state(&self) -> EntryState {
        *self.entry.lock().await
    }

    /// Logs a workout at the pending position. `extra` is cadence for
    /// running and elevation gain for cycling. On a validation error the
    /// pending entry stays open and nothing is stored.
    pub async fn submit(
        &self,
        kind: WorkoutKind,
        distance_km: f64,
        duration_min: f64,
        extra: f64,
    ) -> Result<Workout, DataManagerError> {
        let mut entry = self.entry.lock().await;

        let EntryState::AwaitingDetails { position } = *entry else {
            return Err(DataManagerError::NoPendingEntry);
        };

        let timestamp = Utc::now();
        let workout = match kind {
            WorkoutKind::Running => {
                let cadence = check_cadence(extra)?;
                Workout::Running(Running::new(position, distance_km, duration_min, cadence, timestamp)?)
            }
            WorkoutKind::Cycling => {
                Workout::Cycling(Cycling::new(position, distance_km, duration_min, extra, timestamp)?)
            }
        };

        let mut workouts = self.workouts.lock().await;
        workouts.push(workout.clone());
        if let Err(err) = self.database.save_workouts(&workouts).await {
            workouts.pop();
            return Err(err);
        }

        *entry = EntryState::Idle;
        tracing::info!("Logged {}", workout.description());

        Ok(workout)
    }

    pub async fn workouts(&self) -> Vec<Workout> {
        self.workouts.lock().await.clone()
    }

    /// Finds a workout by the id the presentation layer keeps on rendered
    /// entries.
    pub async fn workout_by_id(&self, id: &str) -> Option<Workout> {
        self.workouts.lock().await.iter().find(|workout| workout.id() == id).cloned()
    }

    /// Clears the stored entry and the in-memory list. The manager is empty
    /// and idle afterwards.
    pub async fn reset(&self) -> Result<(), DataManagerError> {
        self.database.clear_workouts().await?;
        self.workouts.lock().await.clear();
        *self.entry.lock().await = EntryState::Idle;

        tracing::info!("Cleared all workouts");
        Ok(())
    }
}

/// Cadence arrives as raw numeric form input but is stored as steps per
/// minute, so it has to be a positive whole number.
fn check_cadence(value: f64) -> Result<u32, DataManagerError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite("cadence").into());
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive("cadence").into());
    }
    if value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(ValidationError::NotInteger("cadence").into());
    }

    Ok(value as u32)
}

#[cfg(test)]
async fn test_manager() -> (WorkoutManager, tempfile::TempDir) {
    let (database, dir) = crate::database::db::temp_database().await;
    (WorkoutManager::with_database(database).await.unwrap(), dir)
}

#[tokio::test]
async fn submit_logs_and_persists_a_workout() {
    let (manager, _dir) = test_manager().await;

    manager.begin_entry(Point::new(-74.0, 40.7)).await;
    let workout = manager.submit(WorkoutKind::Running, 5.2, 24.0, 178.0).await.unwrap();

    let Workout::Running(running) = &workout else {
        panic!("expected a running workout");
    };
    assert_eq!(running.pace_min_per_km, 4.62);
    assert_eq!(running.position, Point::new(-74.0, 40.7));

    assert_eq!(manager.entry_state().await, EntryState::Idle);
    assert_eq!(manager.workouts().await, vec![workout.clone()]);
    assert_eq!(manager.database.load_workouts().await.unwrap(), vec![workout]);
}

#[tokio::test]
async fn submit_without_pending_entry_is_rejected() {
    let (manager, _dir) = test_manager().await;

    let result = manager.submit(WorkoutKind::Cycling, 20.0, 60.0, 400.0).await;

    assert!(matches!(result, Err(DataManagerError::NoPendingEntry)));
}

#[tokio::test]
async fn failed_validation_changes_nothing() {
    let (manager, _dir) = test_manager().await;
    let position = Point::new(-74.0, 40.7);

    manager.begin_entry(position).await;
    let result = manager.submit(WorkoutKind::Running, -5.0, 24.0, 178.0).await;

    assert!(matches!(
        result,
        Err(DataManagerError::Validation(ValidationError::NotPositive("distance")))
    ));
    assert!(manager.workouts().await.is_empty());
    assert!(manager.database.load_workouts().await.unwrap().is_empty());
    assert_eq!(manager.entry_state().await, EntryState::AwaitingDetails { position });
}

#[tokio::test]
async fn fractional_cadence_is_rejected() {
    let (manager, _dir) = test_manager().await;

    manager.begin_entry(Point::new(-74.0, 40.7)).await;
    let result = manager.submit(WorkoutKind::Running, 5.2, 24.0, 178.5).await;

    assert!(matches!(
        result,
        Err(DataManagerError::Validation(ValidationError::NotInteger("cadence")))
    ));
}

#[tokio::test]
async fn another_click_moves_the_pending_entry() {
    let (manager, _dir) = test_manager().await;

    manager.begin_entry(Point::new(-74.0, 40.7)).await;
    manager.begin_entry(Point::new(10.2, 56.1)).await;

    assert_eq!(
        manager.entry_state().await,
        EntryState::AwaitingDetails { position: Point::new(10.2, 56.1) }
    );
}

#[tokio::test]
async fn workouts_are_found_by_id() {
    let (manager, _dir) = test_manager().await;

    manager.begin_entry(Point::new(-74.0, 40.7)).await;
    let workout = manager.submit(WorkoutKind::Cycling, 20.0, 60.0, 0.0).await.unwrap();

    assert_eq!(manager.workout_by_id(workout.id()).await, Some(workout));
    assert_eq!(manager.workout_by_id("0000000000").await, None);
}

#[tokio::test]
async fn reset_clears_memory_and_storage() {
    let (manager, _dir) = test_manager().await;

    manager.begin_entry(Point::new(-74.0, 40.7)).await;
    manager.submit(WorkoutKind::Running, 5.2, 24.0, 178.0).await.unwrap();
    manager.reset().await.unwrap();

    assert!(manager.workouts().await.is_empty());
    assert!(manager.database.load_workouts().await.unwrap().is_empty());
    assert_eq!(manager.entry_state().await, EntryState::Idle);
}

#[tokio::test]
async fn restart_restores_stored_workouts() {
    let (database, _dir) = crate::database::db::temp_database().await;

    let manager = WorkoutManager::with_database(database.clone()).await.unwrap();
    manager.begin_entry(Point::new(-74.0, 40.7)).await;
    let workout = manager.submit(WorkoutKind::Running, 5.2, 24.0, 178.0).await.unwrap();

    let restarted = WorkoutManager::with_database(database).await.unwrap();
    assert_eq!(restarted.workouts().await, vec![workout]);
}
