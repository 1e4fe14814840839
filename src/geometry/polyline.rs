use super::{error::GeometryError, Envelope, Point};

/// An ordered sequence of points, length >= 2 after construction-time
/// deduplication of consecutive equal points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            if deduped.last() != Some(&p) {
                deduped.push(p);
            }
        }
        if deduped.len() < 2 {
            return Err(GeometryError::TooFewPoints(deduped.len()));
        }
        Ok(Self { points: deduped })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start_point(&self) -> Point {
        self.points[0]
    }

    pub fn end_point(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        false // invariant: always >= 2 points
    }

    /// Returns a polyline with the point order reversed.
    pub fn reverse(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline { points }
    }

    pub fn bounding_box(&self) -> Envelope {
        let mut env = Envelope::EMPTY;
        for p in &self.points {
            env.expand_to_include_xy(p.x(), p.y());
        }
        env
    }

    /// Iterates the consecutive `(a, b)` segments making up this polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total planar length of the polyline (sum of Euclidean segment
    /// lengths), in the native coordinate units. Used for diagnostics; the
    /// matcher itself always measures length via a topology calculator.
    pub fn planar_length(&self) -> f64 {
        self.segments()
            .map(|(a, b)| ((b.x() - a.x()).powi(2) + (b.y() - a.y()).powi(2)).sqrt())
            .sum()
    }
}
