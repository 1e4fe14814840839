use crate::geometry::Polyline;

use super::node::NodeId;

/// Stable index of an [`Edge`] within a [`super::RoadGraph`]'s edge slab.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A directed road-graph edge. `path` defaults to the straight segment
/// between `from`/`to` when no richer geometry is supplied. `weight` is the
/// path length under the graph's topology calculator; equality is
/// `(from, to, weight)` per the data model, so two edges between the same
/// node pair with different geometry but equal length are still considered
/// duplicates and only one is kept.
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: String,
    pub from: NodeId,
    pub to: NodeId,
    pub path: Polyline,
    pub weight: f64,
}

impl Edge {
    pub fn new(id: impl Into<String>, from: NodeId, to: NodeId, path: Polyline, weight: f64) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            path,
            weight,
        }
    }

    /// `true` iff `from`/`to` are swapped between `self` and `other` — the
    /// "no U-turn" condition, independent of the two edges' geometry or id.
    pub fn is_reverse_of(&self, other: &Edge) -> bool {
        self.from == other.to && self.to == other.from
    }

    fn key(&self) -> (NodeId, NodeId, u64) {
        (self.from, self.to, self.weight.to_bits())
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}
