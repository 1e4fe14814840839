//! Planar convex hull, for input preparation rather than the matcher
//! itself. Andrew's monotone-chain construction.

use super::Point;

/// Computes the convex hull of `points`, returned counter-clockwise starting
/// from the lowest-then-leftmost point. Returns an empty vector for fewer
/// than 3 distinct points.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort();
    sorted.dedup();
    if sorted.len() < 3 {
        return Vec::new();
    }

    let cross = |o: &Point, a: &Point, b: &Point| -> f64 {
        (a.x() - o.x()) * (b.y() - o.y()) - (a.y() - o.y()) * (b.x() - o.x())
    };

    let mut lower: Vec<Point> = Vec::new();
    for p in &sorted {
        while lower.len() >= 2
            && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point> = Vec::new();
    for p in sorted.iter().rev() {
        while upper.len() >= 2
            && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;

    #[test]
    fn square_with_interior_point_drops_interior() {
        let f = GeometryFactory::planar();
        let pts = vec![
            f.create_point(0.0, 0.0).unwrap(),
            f.create_point(10.0, 0.0).unwrap(),
            f.create_point(10.0, 10.0).unwrap(),
            f.create_point(0.0, 10.0).unwrap(),
            f.create_point(5.0, 5.0).unwrap(),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
    }
}
