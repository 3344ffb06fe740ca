use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_tracker_data_management::WorkoutManager;
use workout_tracker_lib::workout::Workout;

// CLI for manual data operations
#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=trace", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let manager = WorkoutManager::start().await.unwrap();

    match std::env::args().nth(1).as_deref() {
        Some("list") | None => list(&manager).await,
        Some("reset") => {
            manager.reset().await.unwrap();
        }
        Some(other) => {
            tracing::error!("Unknown command: {other}. Commands: list, reset");
        }
    }
}

async fn list(manager: &WorkoutManager) {
    let workouts = manager.workouts().await;

    if workouts.is_empty() {
        tracing::info!("No stored workouts");
        return;
    }

    for workout in workouts {
        match workout {
            Workout::Running(running) => tracing::info!(
                "{} [{}]: {} km in {} min, {} min/km, {} spm",
                running.description,
                running.id,
                running.distance_km,
                running.duration_min,
                running.pace_min_per_km,
                running.cadence_spm,
            ),
            Workout::Cycling(cycling) => tracing::info!(
                "{} [{}]: {} km in {} min, {} km/h, {} m climbed",
                cycling.description,
                cycling.id,
                cycling.distance_km,
                cycling.duration_min,
                cycling.speed_km_per_h,
                cycling.elevation_gain_m,
            ),
        }
    }
}
