use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::{cycling::Cycling, running::Running};

/// One logged activity. The stored form carries a lowercase `type` tag, so
/// deserializing brings back the full variant and not just plain fields.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Workout {
    Running(Running),
    Cycling(Cycling),
}

impl Workout {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            Workout::Running(_) => WorkoutKind::Running,
            Workout::Cycling(_) => WorkoutKind::Cycling,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Workout::Running(running) => &running.id,
            Workout::Cycling(cycling) => &cycling.id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Workout::Running(running) => running.timestamp,
            Workout::Cycling(cycling) => cycling.timestamp,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Workout::Running(running) => running.position,
            Workout::Cycling(cycling) => cycling.position,
        }
    }

    pub fn distance_km(&self) -> f64 {
        match self {
            Workout::Running(running) => running.distance_km,
            Workout::Cycling(cycling) => cycling.distance_km,
        }
    }

    pub fn duration_min(&self) -> f64 {
        match self {
            Workout::Running(running) => running.duration_min,
            Workout::Cycling(cycling) => cycling.duration_min,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Workout::Running(running) => &running.description,
            Workout::Cycling(cycling) => &cycling.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} has to be a finite number")]
    NotFinite(&'static str),
    #[error("{0} has to be a positive number")]
    NotPositive(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{0} has to be a whole number")]
    NotInteger(&'static str),
}

/// Last 10 digits of the creation time in milliseconds. Two workouts logged
/// within the same millisecond share an id, which the original design
/// accepts.
pub fn derive_id(timestamp: DateTime<Utc>) -> String {
    let millis = timestamp.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(10);
    millis[start..].to_string()
}

pub fn describe(kind: WorkoutKind, timestamp: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), timestamp.format("%B %-d"))
}

pub(crate) fn check_finite_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(value)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::running::Running;

    #[test]
    fn id_is_last_ten_digits_of_millis() {
        let timestamp = DateTime::from_timestamp_millis(1_722_945_600_000).unwrap();
        assert_eq!(derive_id(timestamp), "2945600000");
    }

    #[test]
    fn description_names_kind_month_and_day() {
        let timestamp = Utc.with_ymd_and_hms(2026, 8, 6, 17, 30, 0).unwrap();
        assert_eq!(describe(WorkoutKind::Running, timestamp), "Running on August 6");
        assert_eq!(describe(WorkoutKind::Cycling, timestamp), "Cycling on August 6");
    }

    #[test]
    fn stored_form_is_tagged_by_kind() {
        let timestamp = Utc.with_ymd_and_hms(2026, 4, 4, 9, 0, 0).unwrap();
        let workout = Workout::Running(
            Running::new(Point::new(-74.0, 40.7), 5.2, 24.0, 178, timestamp).unwrap(),
        );

        let json = serde_json::to_string(&workout).unwrap();
        assert!(json.contains("\"type\":\"running\""));

        let restored: Workout = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, workout);
        assert_eq!(restored.kind(), WorkoutKind::Running);
    }

    #[test]
    fn common_fields_are_readable_through_the_enum() {
        let timestamp = Utc.with_ymd_and_hms(2026, 4, 4, 9, 0, 0).unwrap();
        let workout = Workout::Running(
            Running::new(Point::new(-74.0, 40.7), 5.2, 24.0, 178, timestamp).unwrap(),
        );

        assert_eq!(workout.distance_km(), 5.2);
        assert_eq!(workout.duration_min(), 24.0);
        assert_eq!(workout.position(), Point::new(-74.0, 40.7));
        assert_eq!(workout.description(), "Running on April 4");
        assert_eq!(workout.id().len(), 10);
    }
}
