//! Balanced, succinctly-addressed 2-D k-d tree.
//!
//! Bulk-built from a point list via median selection (quickselect) on the
//! axis `depth mod 2`. Storage is a flat `Vec<Point>` addressed by the
//! standard binary-heap indexing scheme: node `i` has left child `2i+1` and
//! right child `2i+2` — no pointers, no parent links.

use std::cmp::Ordering;

use crate::geometry::{Envelope, Point, PRECISION_TOLERANCE};
use super::error::SpatialIndexError;

const DIMENSIONS: usize = 2;

fn axis_value(p: &Point, axis: usize) -> f64 {
    match axis % DIMENSIONS {
        0 => p.x(),
        _ => p.y(),
    }
}

/// A balanced k-d tree over 2-D points, stored as a flat, implicitly-indexed
/// array. Holes in the implicit binary tree (when the input count is
/// not `2^n - 1`) are represented as `None` slots.
pub struct KdTree {
    nodes: Vec<Option<Point>>,
}

impl KdTree {
    /// Builds a balanced k-d tree from `points` via recursive median
    /// selection, addressed by the implicit binary-heap indexing scheme
    /// (node `i` has children `2i+1`/`2i+2`). Returns
    /// [`SpatialIndexError::DepthExceeded`] if that indexing scheme would
    /// overflow `usize`.
    pub fn build(points: Vec<Point>) -> Result<Self, SpatialIndexError> {
        if points.is_empty() {
            return Ok(Self { nodes: Vec::new() });
        }
        let n = points.len();
        // node i has children 2i+1, 2i+2; the maximum index touched by n
        // items in a balanced tree is bounded by 2n, which cannot overflow
        // for any n that fits in memory as a Vec<Point> already would not.
        let capacity = n.checked_mul(2).ok_or(SpatialIndexError::DepthExceeded {
            index: usize::MAX,
            limit: usize::MAX,
        })?;
        let mut nodes: Vec<Option<Point>> = vec![None; capacity.max(1)];
        build_recursive(&mut points.into_iter().collect::<Vec<_>>(), 0, 0, &mut nodes)?;
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` iff an equal-within-precision point exists in the tree.
    pub fn contains(&self, p: &Point) -> bool {
        self.contains_at(0, 0, p)
    }

    fn contains_at(&self, idx: usize, depth: usize, p: &Point) -> bool {
        let node = match self.nodes.get(idx).and_then(|n| n.as_ref()) {
            Some(n) => n,
            None => return false,
        };
        if node == p {
            return true;
        }
        let axis = depth % DIMENSIONS;
        let cmp = axis_value(p, axis) - axis_value(node, axis);
        if cmp.abs() <= PRECISION_TOLERANCE {
            // could be on either side; check both.
            return self.contains_at(2 * idx + 1, depth + 1, p)
                || self.contains_at(2 * idx + 2, depth + 1, p);
        }
        if cmp < 0.0 {
            self.contains_at(2 * idx + 1, depth + 1, p)
        } else {
            self.contains_at(2 * idx + 2, depth + 1, p)
        }
    }

    /// Best-first nearest-neighbour search (stack-based), pruning by
    /// axis-distance against the current best squared Euclidean distance.
    pub fn nearest_neighbour(&self, p: &Point) -> Option<Point> {
        let mut best: Option<(Point, f64)> = None;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            let node = match self.nodes.get(idx).and_then(|n| n.as_ref()) {
                Some(n) => n,
                None => continue,
            };
            let d_sq = node.euclidean_distance_sq(p);
            if best.as_ref().map(|(_, b)| d_sq < *b).unwrap_or(true) {
                best = Some((*node, d_sq));
            }
            if let Some((_, b)) = best {
                if b <= PRECISION_TOLERANCE * PRECISION_TOLERANCE {
                    break;
                }
            }
            let axis = depth % DIMENSIONS;
            let diff = axis_value(p, axis) - axis_value(node, axis);
            let (near, far) = if diff < 0.0 {
                (2 * idx + 1, 2 * idx + 2)
            } else {
                (2 * idx + 2, 2 * idx + 1)
            };
            // visit the near side first so it tends to tighten `best` before
            // we decide whether the far side can be pruned.
            let should_visit_far = best.as_ref().map(|(_, b)| diff * diff < *b).unwrap_or(true);
            if should_visit_far {
                stack.push((far, depth + 1));
            }
            stack.push((near, depth + 1));
        }
        best.map(|(p, _)| p)
    }

    /// Returns every stored point within the axis-aligned range
    /// `[range_min, range_max]`, stack-based traversal pruning subtrees
    /// whose splitting axis interval cannot intersect the range.
    pub fn range_query(&self, range: &Envelope) -> Vec<Point> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            let node = match self.nodes.get(idx).and_then(|n| n.as_ref()) {
                Some(n) => n,
                None => continue,
            };
            if range.contains_xy(node.x(), node.y()) {
                out.push(*node);
            }
            let axis = depth % DIMENSIONS;
            let (lo, hi) = match axis {
                0 => (range.min_x, range.max_x),
                _ => (range.min_y, range.max_y),
            };
            let node_val = axis_value(node, axis);
            if node_val >= lo {
                stack.push((2 * idx + 1, depth + 1));
            }
            if node_val <= hi {
                stack.push((2 * idx + 2, depth + 1));
            }
        }
        out
    }
}

fn build_recursive(
    points: &mut [Point],
    idx: usize,
    depth: usize,
    nodes: &mut Vec<Option<Point>>,
) -> Result<(), SpatialIndexError> {
    if points.is_empty() {
        return Ok(());
    }
    if idx >= nodes.len() {
        return Err(SpatialIndexError::DepthExceeded {
            index: idx,
            limit: nodes.len(),
        });
    }
    let axis = depth % DIMENSIONS;
    let mid = points.len() / 2;
    quickselect(points, mid, axis);

    nodes[idx] = Some(points[mid]);
    let (left, right) = points.split_at_mut(mid);
    let right = &mut right[1..];
    build_recursive(left, 2 * idx + 1, depth + 1, nodes)?;
    build_recursive(right, 2 * idx + 2, depth + 1, nodes)?;
    Ok(())
}

/// Partial-sorts `points` in place so the element at `k` is the one that
/// would occupy that position in a full sort by `axis`, via repeated
/// partitioning (quickselect, Lomuto scheme).
fn quickselect(points: &mut [Point], k: usize, axis: usize) {
    let mut lo = 0;
    let mut hi = points.len() - 1;
    loop {
        if lo >= hi {
            return;
        }
        let pivot_idx = partition(points, lo, hi, axis);
        match k.cmp(&pivot_idx) {
            Ordering::Equal => return,
            Ordering::Less => hi = pivot_idx - 1,
            Ordering::Greater => lo = pivot_idx + 1,
        }
    }
}

fn partition(points: &mut [Point], lo: usize, hi: usize, axis: usize) -> usize {
    let pivot = axis_value(&points[hi], axis);
    let mut i = lo;
    for j in lo..hi {
        if axis_value(&points[j], axis) < pivot {
            points.swap(i, j);
            i += 1;
        }
    }
    points.swap(i, hi);
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryFactory;

    fn pt(x: f64, y: f64) -> Point {
        GeometryFactory::planar().create_point(x, y).unwrap()
    }

    #[test]
    fn s4_nearest_and_contains() {
        let tree = KdTree::build(vec![pt(1.0, 1.0), pt(2.0, 2.0), pt(1.0, 2.0)]).unwrap();
        assert_eq!(tree.nearest_neighbour(&pt(3.0, 3.0)), Some(pt(2.0, 2.0)));
        assert!(tree.contains(&pt(1.0, 1.0)));
        assert!(!tree.contains(&pt(10.0, 10.0)));
    }

    #[test]
    fn range_query_returns_points_in_bounds() {
        let tree = KdTree::build(vec![pt(0.0, 0.0), pt(5.0, 5.0), pt(10.0, 10.0)]).unwrap();
        let hits = tree.range_query(&Envelope::new(-1.0, 6.0, -1.0, 6.0));
        assert_eq!(hits.len(), 2);
    }
}
