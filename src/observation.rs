//! A single GPS fix: a [`Point`] plus the UTC instant it was recorded at.
//! Observations are ordered externally by timestamp; nothing in this crate
//! re-sorts them.

use chrono::{DateTime, Utc};

use crate::geometry::Point;

/// A time-stamped position observation, nanosecond precision via
/// `chrono::DateTime<Utc>`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Observation {
    pub point: Point,
    pub at: DateTime<Utc>,
}

impl Observation {
    pub fn new(point: Point, at: DateTime<Utc>) -> Self {
        Self { point, at }
    }

    /// Seconds elapsed from `self` to `other`. Negative if `other` precedes
    /// `self` — callers in debug builds are expected to assert
    /// non-decreasing timestamps before relying on this.
    pub fn seconds_since(&self, other: &Observation) -> f64 {
        (self.at - other.at).num_nanoseconds().unwrap_or(0) as f64 / 1e9
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;
    use chrono::TimeZone;

    #[test]
    fn seconds_since_is_positive_for_later_observation() {
        let f = GeometryFactory::geoidal();
        let p = f.create_point(5.0, 52.0).unwrap();
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 5).unwrap();
        let a = Observation::new(p, t0);
        let b = Observation::new(p, t1);
        assert_eq!(b.seconds_since(&a), 5.0);
    }
}
