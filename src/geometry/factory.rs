/// The calculator variant bound to a [`GeometryFactory`]; every geometry
/// produced by a factory carries this tag so that distance/bearing
/// operations never require the caller to branch on the concrete
/// implementation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FactoryKind {
    /// Exact Euclidean geometry on the factory's native `(x, y)` plane.
    Planar,
    /// WGS84 ellipsoid, Vincenty's formulae. Sub-metre accuracy, possible
    /// convergence failure near antipodes.
    Geoidal,
    /// WGS84 sphere approximation: Haversine distance, constant Earth
    /// radius. Always converges; loses sub-metre accuracy away from the
    /// equator.
    GeoidalApproximate,
}

use super::{Envelope, GeometryError, Point, Polyline};

/// Binds a [`FactoryKind`] to geometry construction, the one seam through
/// which points and polylines are built. Explicit and cheaply `Copy`,
/// carried by every [`Point`] it produces — no process-wide singleton
/// state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeometryFactory {
    kind: FactoryKind,
}

impl GeometryFactory {
    pub fn new(kind: FactoryKind) -> Self {
        Self { kind }
    }

    pub fn planar() -> Self {
        Self::new(FactoryKind::Planar)
    }

    pub fn geoidal() -> Self {
        Self::new(FactoryKind::Geoidal)
    }

    pub fn geoidal_approximate() -> Self {
        Self::new(FactoryKind::GeoidalApproximate)
    }

    pub fn kind(&self) -> FactoryKind {
        self.kind
    }

    /// Creates a 2-D point, validating latitude/longitude range when the
    /// factory is geoidal.
    pub fn create_point(&self, x: f64, y: f64) -> Result<Point, GeometryError> {
        Point::new(x, y, None, *self)
    }

    pub fn create_point_z(&self, x: f64, y: f64, z: f64) -> Result<Point, GeometryError> {
        Point::new(x, y, Some(z), *self)
    }

    pub fn create_polyline(&self, points: Vec<Point>) -> Result<Polyline, GeometryError> {
        Polyline::new(points)
    }

    /// Creates a 2-point straight polyline from two coordinate pairs.
    pub fn create_segment(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Polyline, GeometryError> {
        let a = self.create_point(x1, y1)?;
        let b = self.create_point(x2, y2)?;
        self.create_polyline(vec![a, b])
    }

    pub fn empty_envelope(&self) -> Envelope {
        Envelope::EMPTY
    }
}
