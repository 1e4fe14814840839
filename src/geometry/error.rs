/// Invalid-input errors raised by geometry constructors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("latitude {0} is outside the valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside the valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("polyline requires at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("simplification tolerance must be positive, got {0}")]
    NonPositiveTolerance(f64),
}
