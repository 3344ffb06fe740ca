use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::workout::{check_finite_positive, derive_id, describe, round2, ValidationError, WorkoutKind};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Cycling {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub position: Point,
    pub distance_km: f64,
    pub duration_min: f64,
    pub elevation_gain_m: f64,
    pub speed_km_per_h: f64,
    pub description: String,
}

impl Cycling {
    /// Validates the inputs and derives speed (km/h), id and description.
    /// Zero elevation gain is allowed, a ride can be flat.
    pub fn new(
        position: Point,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        check_finite_positive("distance", distance_km)?;
        check_finite_positive("duration", duration_min)?;
        if !elevation_gain_m.is_finite() {
            return Err(ValidationError::NotFinite("elevation gain"));
        }
        if elevation_gain_m < 0.0 {
            return Err(ValidationError::Negative("elevation gain"));
        }

        Ok(Self {
            id: derive_id(timestamp),
            timestamp,
            position,
            distance_km,
            duration_min,
            elevation_gain_m,
            speed_km_per_h: round2(distance_km / (duration_min / 60.0)),
            description: describe(WorkoutKind::Cycling, timestamp),
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
    fn speed_is_distance_over_hours_rounded() {
        let cycling = Cycling::new(position(), 20.0, 60.0, 400.0, timestamp()).unwrap();
        assert_eq!(cycling.speed_km_per_h, 20.0);
        assert_eq!(cycling.description, "Cycling on August 6");
    }

    #[test]
    fn speed_rounds_to_two_decimals() {
        let cycling = Cycling::new(position(), 10.0, 37.0, 120.0, timestamp()).unwrap();
        assert_eq!(cycling.speed_km_per_h, 16.22);
    }

    #[test]
    fn flat_rides_are_valid() {
        let cycling = Cycling::new(position(), 20.0, 60.0, 0.0, timestamp()).unwrap();
        assert_eq!(cycling.elevation_gain_m, 0.0);
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert_eq!(
            Cycling::new(position(), 20.0, 0.0, 400.0, timestamp()),
            Err(ValidationError::NotPositive("duration"))
        );
        assert_eq!(
            Cycling::new(position(), 20.0, 60.0, -5.0, timestamp()),
            Err(ValidationError::Negative("elevation gain"))
        );
        assert_eq!(
            Cycling::new(position(), 20.0, 60.0, f64::NAN, timestamp()),
            Err(ValidationError::NotFinite("elevation gain"))
        );
    }
}
