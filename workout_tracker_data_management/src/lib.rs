use const_format::concatcp;

pub mod database;
mod data_manager;
pub mod position;

pub use data_manager::*;

pub const DATA_DIR: &str = "data/";
pub const DATABASE_PATH: &str = concatcp!(DATA_DIR, "database.db");

#[derive(Debug, thiserror::Error)]
pub enum DataManagerError {
    #[error("Database error: {0}")]
    Database(String),
    #[error(transparent)]
    Validation(#[from] workout_tracker_lib::workout::ValidationError),
    #[error("No workout entry is in progress")]
    NoPendingEntry,
}
