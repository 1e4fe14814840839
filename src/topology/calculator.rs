use super::error::TopologyError;
use super::{haversine, planar, spherical, wgs84};
use crate::geometry::{FactoryKind, Point, Polyline};

/// The topology calculator contract, realized as a tagged variant over the
/// three recognized implementations. Every operation takes explicit
/// [`Point`]/[`Polyline`] values; there is no implicit global state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Calculator {
    Planar,
    Geoidal,
    GeoidalApproximate,
}

impl From<FactoryKind> for Calculator {
    fn from(kind: FactoryKind) -> Self {
        match kind {
            FactoryKind::Planar => Calculator::Planar,
            FactoryKind::Geoidal => Calculator::Geoidal,
            FactoryKind::GeoidalApproximate => Calculator::GeoidalApproximate,
        }
    }
}

impl Calculator {
    pub fn for_point(p: &Point) -> Self {
        Calculator::from(p.factory().kind())
    }

    /// Orthodromic / Euclidean distance between two points, metres (planar:
    /// native coordinate units).
    pub fn distance(&self, a: &Point, b: &Point) -> Result<f64, TopologyError> {
        match self {
            Calculator::Planar => Ok(planar::distance(a.x(), a.y(), b.x(), b.y())),
            Calculator::Geoidal => {
                Ok(wgs84::inverse(a.y(), a.x(), b.y(), b.x())?.distance_m)
            }
            Calculator::GeoidalApproximate => Ok(haversine::distance_m(a.y(), a.x(), b.y(), b.x())),
        }
    }

    /// Minimum distance from `p` to the closest segment of `line`, i.e. the
    /// cross-track distance the map matcher's emission probability needs.
    ///
    /// See `DESIGN.md` for why every variant computes the real minimum
    /// distance here rather than a cheaper placeholder.
    pub fn distance_to_polyline(&self, p: &Point, line: &Polyline) -> Result<f64, TopologyError> {
        let mut best = f64::INFINITY;
        for (a, b) in line.segments() {
            let closest = self.on_track_closest_point(&a, &b, p)?;
            let d = self.distance(p, &closest)?;
            if d < best {
                best = d;
            }
        }
        Ok(best)
    }

    pub fn initial_bearing(&self, a: &Point, b: &Point) -> Result<f64, TopologyError> {
        match self {
            Calculator::Planar => Ok(planar::bearing_deg(a.x(), a.y(), b.x(), b.y())),
            Calculator::Geoidal => Ok(wgs84::inverse(a.y(), a.x(), b.y(), b.x())?.initial_bearing_deg),
            Calculator::GeoidalApproximate => {
                Ok(spherical::spherical_bearing_deg(a.y(), a.x(), b.y(), b.x()))
            }
        }
    }

    pub fn destination(
        &self,
        origin: &Point,
        bearing_deg: f64,
        distance: f64,
    ) -> Result<(f64, f64), TopologyError> {
        match self {
            Calculator::Planar => Ok(planar::destination(origin.x(), origin.y(), bearing_deg, distance)),
            Calculator::Geoidal => {
                let r = wgs84::direct(origin.y(), origin.x(), bearing_deg, distance)?;
                Ok((r.lon_deg, r.lat_deg))
            }
            Calculator::GeoidalApproximate => {
                let earth_radius = haversine::APPROX_EARTH_RADIUS_M;
                let theta = bearing_deg.to_radians();
                let delta = distance / earth_radius;
                let phi1 = origin.y().to_radians();
                let lambda1 = origin.x().to_radians();
                let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
                let lambda2 = lambda1
                    + (theta.sin() * delta.sin() * phi1.cos())
                        .atan2(delta.cos() - phi1.sin() * phi2.sin());
                Ok((lambda2.to_degrees(), phi2.to_degrees()))
            }
        }
    }

    /// Closest point on closed segment `a-b` to `p`.
    pub fn on_track_closest_point(
        &self,
        a: &Point,
        b: &Point,
        p: &Point,
    ) -> Result<Point, TopologyError> {
        match self {
            Calculator::Planar => {
                let (x, y) = planar::closest_point_on_segment(a.x(), a.y(), b.x(), b.y(), p.x(), p.y());
                Point::new(x, y, None, p.factory()).map_err(|_| TopologyError::CoincidentPoints)
            }
            Calculator::Geoidal | Calculator::GeoidalApproximate => {
                let radius = haversine::APPROX_EARTH_RADIUS_M;
                let (lat, lon) = spherical::on_track_closest_point(
                    a.y(),
                    a.x(),
                    b.y(),
                    b.x(),
                    p.y(),
                    p.x(),
                    radius,
                );
                Point::new(lon, lat, None, p.factory()).map_err(|_| TopologyError::CoincidentPoints)
            }
        }
    }

    pub fn along_track_distance(&self, a: &Point, b: &Point, p: &Point) -> Result<f64, TopologyError> {
        match self {
            Calculator::Planar => Ok(planar::along_track_distance(a.x(), a.y(), b.x(), b.y(), p.x(), p.y())),
            Calculator::Geoidal | Calculator::GeoidalApproximate => Ok(spherical::along_track_distance_m(
                a.y(),
                a.x(),
                b.y(),
                b.x(),
                p.y(),
                p.x(),
                haversine::APPROX_EARTH_RADIUS_M,
            )),
        }
    }

    pub fn leftmost_point(&self, line: &Polyline) -> Point {
        *line
            .points()
            .iter()
            .min_by(|a, b| a.x().total_cmp(&b.x()))
            .expect("polyline invariant: at least 2 points")
    }

    pub fn rightmost_point(&self, line: &Polyline) -> Point {
        *line
            .points()
            .iter()
            .max_by(|a, b| a.x().total_cmp(&b.x()))
            .expect("polyline invariant: at least 2 points")
    }

    /// All pairwise intersections between segments of `a` and segments of
    /// `b`. For the planar variant this is exact segment intersection; for
    /// the geoidal variants it is the closed-form spherical construction,
    /// which reports neither "no unique intersection" nor "ambiguous"
    /// results (both collapse to "no point here").
    pub fn intersection(&self, a: &Polyline, b: &Polyline) -> Result<Vec<Point>, TopologyError> {
        let mut hits = Vec::new();
        for (a1, a2) in a.segments() {
            for (b1, b2) in b.segments() {
                match self {
                    Calculator::Planar => {
                        if let Some((x, y)) =
                            planar::intersection(a1.x(), a1.y(), a2.x(), a2.y(), b1.x(), b1.y(), b2.x(), b2.y())
                        {
                            if let Ok(p) = Point::new(x, y, None, a1.factory()) {
                                hits.push(p);
                            }
                        }
                    }
                    Calculator::Geoidal | Calculator::GeoidalApproximate => {
                        let result = spherical::intersection(
                            a1.y(),
                            a1.x(),
                            a2.y(),
                            a2.x(),
                            b1.y(),
                            b1.x(),
                            b2.y(),
                            b2.x(),
                        );
                        match result {
                            Ok(Some((lat, lon))) => {
                                if let Ok(p) = Point::new(lon, lat, None, a1.factory()) {
                                    hits.push(p);
                                }
                            }
                            Ok(None) => {}
                            Err(TopologyError::CoincidentPoints) => {}
                            Err(e) => return Err(e),
                        }
                    }
                }
            }
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;
    use approx::assert_relative_eq;

    #[test]
    fn round_trip_geodesic_invariant() {
        let f = GeometryFactory::geoidal();
        let p1 = f.create_point(5.0, 52.0).unwrap();
        let p2 = f.create_point(6.0, 51.4).unwrap();
        let calc = Calculator::Geoidal;
        let dist = calc.distance(&p1, &p2).unwrap();
        let bearing = calc.initial_bearing(&p1, &p2).unwrap();
        let (lon, lat) = calc.destination(&p1, bearing, dist).unwrap();
        assert_relative_eq!(lon, p2.x(), epsilon = 1e-6);
        assert_relative_eq!(lat, p2.y(), epsilon = 1e-6);
    }
}
