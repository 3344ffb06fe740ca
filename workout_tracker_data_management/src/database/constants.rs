pub const STORAGE_TABLE_NAME: &str = "Storage";
pub const KEY: &str = "key";
pub const VALUE: &str = "value";

/// The single entry the workout list lives under.
pub const WORKOUTS_KEY: &str = "workouts";
