//! Exact Euclidean calculator: the planar variant of the topology contract.
//! Operates directly on `(x, y)` without any ellipsoidal or spherical
//! correction — appropriate when the factory's points are already in a
//! projected, locally-planar coordinate system.

/// Euclidean distance between `(x1,y1)` and `(x2,y2)`.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Initial bearing from `(x1,y1)` to `(x2,y2)`, degrees in `[0, 360)`,
/// measured clockwise from the +y axis (north) to match the geodetic
/// convention used by the other calculator variants.
pub fn bearing_deg(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let angle = (x2 - x1).atan2(y2 - y1).to_degrees();
    super::wgs84::normalize_bearing(angle)
}

/// Point reached by travelling `distance` along `bearing_deg` from `(x, y)`.
pub fn destination(x: f64, y: f64, bearing_deg: f64, distance: f64) -> (f64, f64) {
    let rad = bearing_deg.to_radians();
    (x + distance * rad.sin(), y + distance * rad.cos())
}

/// Closest point on closed segment `(ax,ay)-(bx,by)` to `(px,py)`, clamped to
/// the segment's endpoints.
pub fn closest_point_on_segment(
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    px: f64,
    py: f64,
) -> (f64, f64) {
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-15 {
        return (ax, ay);
    }
    let t = (((px - ax) * dx) + ((py - ay) * dy)) / len_sq;
    let t_clamped = t.clamp(0.0, 1.0);
    (ax + t_clamped * dx, ay + t_clamped * dy)
}

/// Signed along-track distance of `(px,py)` projected onto the infinite line
/// through `(ax,ay)-(bx,by)`, in the same units as the input coordinates.
pub fn along_track_distance(ax: f64, ay: f64, bx: f64, by: f64, px: f64, py: f64) -> f64 {
    let (dx, dy) = (bx - ax, by - ay);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-15 {
        return 0.0;
    }
    (((px - ax) * dx) + ((py - ay) * dy)) / len
}

/// Intersection of open segments `(ax1,ay1)-(ax2,ay2)` and
/// `(bx1,by1)-(bx2,by2)`, `None` if parallel or non-intersecting.
#[allow(clippy::too_many_arguments)]
pub fn intersection(
    ax1: f64,
    ay1: f64,
    ax2: f64,
    ay2: f64,
    bx1: f64,
    by1: f64,
    bx2: f64,
    by2: f64,
) -> Option<(f64, f64)> {
    let (r_x, r_y) = (ax2 - ax1, ay2 - ay1);
    let (s_x, s_y) = (bx2 - bx1, by2 - by1);
    let denom = r_x * s_y - r_y * s_x;
    if denom.abs() < 1e-15 {
        return None;
    }
    let (qp_x, qp_y) = (bx1 - ax1, by1 - ay1);
    let t = (qp_x * s_y - qp_y * s_x) / denom;
    let u = (qp_x * r_y - qp_y * r_x) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some((ax1 + t * r_x, ay1 + t * r_y))
}
