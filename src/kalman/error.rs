/// Errors raised by the Kalman filter. Dimension mismatches are a fatal
/// configuration error per §7 — checked on every setter, not just `new`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum KalmanError {
    #[error("{what}: expected {expected_rows}x{expected_cols}, got {got_rows}x{got_cols}")]
    DimensionMismatch {
        what: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
    #[error("observation noise covariance S is singular and cannot be inverted")]
    SingularInnovationCovariance,
}
