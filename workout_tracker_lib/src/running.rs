use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::workout::{check_finite_positive, derive_id, describe, round2, ValidationError, WorkoutKind};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Running {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub position: Point,
    pub distance_km: f64,
    pub duration_min: f64,
    pub cadence_spm: u32,
    pub pace_min_per_km: f64,
    pub description: String,
}

impl Running {
    /// Validates the inputs and derives pace (min/km), id and description.
    /// A record is never modified after this.
    pub fn new(
        position: Point,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        check_finite_positive("distance", distance_km)?;
        check_finite_positive("duration", duration_min)?;
        if cadence_spm == 0 {
            return Err(ValidationError::NotPositive("cadence"));
        }

        Ok(Self {
            id: derive_id(timestamp),
            timestamp,
            position,
            distance_km,
            duration_min,
            cadence_spm,
            pace_min_per_km: round2(duration_min / distance_km),
            description: describe(WorkoutKind::Running, timestamp),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn position() -> Point {
        Point::new(-74.0, 40.7)
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 17, 30, 0).unwrap()
    }

    #[test]
    fn pace_is_duration_over_distance_rounded() {
        let running = Running::new(position(), 5.2, 24.0, 178, timestamp()).unwrap();
        assert_eq!(running.pace_min_per_km, 4.62);
        assert_eq!(running.description, "Running on August 6");
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert_eq!(
            Running::new(position(), 0.0, 24.0, 178, timestamp()),
            Err(ValidationError::NotPositive("distance"))
        );
        assert_eq!(
            Running::new(position(), 5.2, -1.0, 178, timestamp()),
            Err(ValidationError::NotPositive("duration"))
        );
        assert_eq!(
            Running::new(position(), 5.2, 24.0, 0, timestamp()),
            Err(ValidationError::NotPositive("cadence"))
        );
    }

    #[test]
    fn rejects_non_finite_inputs() {
        assert_eq!(
            Running::new(position(), f64::NAN, 24.0, 178, timestamp()),
            Err(ValidationError::NotFinite("distance"))
        );
        assert_eq!(
            Running::new(position(), 5.2, f64::INFINITY, 178, timestamp()),
            Err(ValidationError::NotFinite("duration"))
        );
    }
}
