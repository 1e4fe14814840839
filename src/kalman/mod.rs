//! Linear Kalman filter (§4.7) used to pre-smooth raw GPS observations
//! before map matching: a general `n`/`m`-dimensional filter, two
//! configured presets (position-only, position+velocity), and a
//! whole-trajectory smoother built on top of them.

mod error;
mod filter;
mod presets;
mod smoother;

pub use error::KalmanError;
pub use filter::KalmanFilter;
pub use presets::{KalmanConfig, PositionKalman, PositionVelocityKalman};
pub use smoother::{smooth, KalmanPreset};
