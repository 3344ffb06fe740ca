use geo_types::Point;

/// One-shot source of the user's current position, standing in for the
/// browser geolocation request. No retry and no timeout; a failure is
/// surfaced to the user once and the map simply starts without a viewport.
pub trait PositionProvider {
    fn current_position(&self) -> Result<Point, PositionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Could not get your position")]
    Unavailable,
}

/// Provider with a known position, for tests and demos.
pub struct FixedPosition(pub Point);

impl PositionProvider for FixedPosition {
    fn current_position(&self) -> Result<Point, PositionError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DeniedPosition;

    impl PositionProvider for DeniedPosition {
        fn current_position(&self) -> Result<Point, PositionError> {
            Err(PositionError::Unavailable)
        }
    }

    #[test]
    fn fixed_provider_returns_its_position() {
        let provider = FixedPosition(Point::new(10.2, 56.1));
        assert_eq!(provider.current_position(), Ok(Point::new(10.2, 56.1)));
    }

    #[test]
    fn failure_carries_the_user_facing_message() {
        let err = DeniedPosition.current_position().unwrap_err();
        assert_eq!(err.to_string(), "Could not get your position");
    }
}
