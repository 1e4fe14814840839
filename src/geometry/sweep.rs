//! Bentley–Ottmann sweep-line segment intersection, for generic
//! segment-intersection tests off the map-matcher hot path. A textbook
//! sweep: a left-to-right event queue of segment
//! endpoints and discovered crossings, and a status structure of segments
//! currently crossing the sweep line, ordered by their y-coordinate at the
//! sweep position. Degenerate inputs (vertical segments, exact endpoint
//! coincidences, overlapping collinear segments) are resolved by an epsilon
//! comparison rather than exact symbolic perturbation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::Point;

#[derive(Copy, Clone, Debug)]
struct Segment {
    a: (f64, f64),
    b: (f64, f64),
    index: usize,
}

impl Segment {
    fn y_at(&self, x: f64) -> f64 {
        if (self.b.0 - self.a.0).abs() < 1e-15 {
            self.a.1
        } else {
            let t = (x - self.a.0) / (self.b.0 - self.a.0);
            self.a.1 + t * (self.b.1 - self.a.1)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Event {
    x: f64,
    y: f64,
    kind: EventKind,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum EventKind {
    Start(usize),
    End(usize),
    Cross(usize, usize),
}

impl Eq for Event {}
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so we pop smallest x (then y) first.
        other
            .x
            .total_cmp(&self.x)
            .then_with(|| other.y.total_cmp(&self.y))
    }
}
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds every pairwise intersection point among `segments`, each given as
/// `(start, end)`. Returns `(i, j, point)` for every crossing pair `i < j`.
pub fn find_intersections(segments: &[(Point, Point)]) -> Vec<(usize, usize, Point)> {
    let segs: Vec<Segment> = segments
        .iter()
        .enumerate()
        .map(|(i, (a, b))| Segment {
            a: (a.x(), a.y()),
            b: (b.x(), b.y()),
            index: i,
        })
        .collect();

    let mut queue: BinaryHeap<Event> = BinaryHeap::new();
    for s in &segs {
        let (left, right) = if s.a.0 <= s.b.0 { (s.a, s.b) } else { (s.b, s.a) };
        queue.push(Event {
            x: left.0,
            y: left.1,
            kind: EventKind::Start(s.index),
        });
        queue.push(Event {
            x: right.0,
            y: right.1,
            kind: EventKind::End(s.index),
        });
    }

    let mut active: Vec<usize> = Vec::new();
    let mut found: Vec<(usize, usize, Point)> = Vec::new();
    let mut seen_pairs: std::collections::HashSet<(usize, usize)> = std::collections::HashSet::new();
    let factory = segments
        .first()
        .map(|(a, _)| a.factory())
        .unwrap_or_else(crate::geometry::GeometryFactory::planar);

    while let Some(ev) = queue.pop() {
        match ev.kind {
            EventKind::Start(i) => {
                active.push(i);
                active.sort_by(|&p, &q| segs[p].y_at(ev.x).total_cmp(&segs[q].y_at(ev.x)));
                check_neighbors(i, &active, &segs, ev.x, &mut queue, &mut seen_pairs);
            }
            EventKind::End(i) => {
                active.retain(|&x| x != i);
            }
            EventKind::Cross(i, j) => {
                let pair = (i.min(j), i.max(j));
                if seen_pairs.contains(&pair) {
                    continue;
                }
                if let Some((x, y)) = segment_intersection(&segs[i], &segs[j]) {
                    if let Ok(p) = factory.create_point(x, y) {
                        found.push((pair.0, pair.1, p));
                    }
                    seen_pairs.insert(pair);
                    active.sort_by(|&p, &q| segs[p].y_at(x + 1e-9).total_cmp(&segs[q].y_at(x + 1e-9)));
                }
            }
        }
    }
    found
}

fn check_neighbors(
    i: usize,
    active: &[usize],
    segs: &[Segment],
    x: f64,
    queue: &mut BinaryHeap<Event>,
    seen_pairs: &mut std::collections::HashSet<(usize, usize)>,
) {
    if let Some(pos) = active.iter().position(|&v| v == i) {
        if pos > 0 {
            try_schedule(segs, active[pos - 1], i, x, queue, seen_pairs);
        }
        if pos + 1 < active.len() {
            try_schedule(segs, i, active[pos + 1], x, queue, seen_pairs);
        }
    }
}

fn try_schedule(
    segs: &[Segment],
    i: usize,
    j: usize,
    after_x: f64,
    queue: &mut BinaryHeap<Event>,
    seen_pairs: &mut std::collections::HashSet<(usize, usize)>,
) {
    let pair = (i.min(j), i.max(j));
    if seen_pairs.contains(&pair) {
        return;
    }
    if let Some((x, y)) = segment_intersection(&segs[i], &segs[j]) {
        if x >= after_x {
            queue.push(Event {
                x,
                y,
                kind: EventKind::Cross(i, j),
            });
        }
    }
}

fn segment_intersection(s1: &Segment, s2: &Segment) -> Option<(f64, f64)> {
    crate::topology::planar::intersection(
        s1.a.0, s1.a.1, s1.b.0, s1.b.1, s2.a.0, s2.a.1, s2.b.0, s2.b.1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;

    #[test]
    fn finds_single_crossing() {
        let f = GeometryFactory::planar();
        let segs = vec![
            (f.create_point(-1.0, 0.0).unwrap(), f.create_point(1.0, 0.0).unwrap()),
            (f.create_point(0.0, -1.0).unwrap(), f.create_point(0.0, 1.0).unwrap()),
        ];
        let hits = find_intersections(&segs);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].2.x()).abs() < 1e-9);
        assert!((hits[0].2.y()).abs() < 1e-9);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let f = GeometryFactory::planar();
        let segs = vec![
            (f.create_point(0.0, 0.0).unwrap(), f.create_point(1.0, 0.0).unwrap()),
            (f.create_point(0.0, 1.0).unwrap(), f.create_point(1.0, 1.0).unwrap()),
        ];
        assert!(find_intersections(&segs).is_empty());
    }
}
