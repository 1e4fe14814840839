//! Hilbert-packed R-tree ("HPRtree"). A static, bulk-loaded index of
//! envelope-keyed items: build once by sorting along a fixed-level Hilbert
//! curve and packing into fixed-fanout leaves, then query by envelope
//! intersection.

use crate::geometry::Envelope;
use super::hilbert::hilbert_code_for;

/// Default leaf/internal fanout used when none is supplied.
pub const DEFAULT_NODE_CAPACITY: usize = 16;

enum Node<T> {
    Leaf(Vec<(Envelope, T)>),
    Internal {
        envelope: Envelope,
        children: Vec<Node<T>>,
    },
}

impl<T> Node<T> {
    fn envelope(&self) -> Envelope {
        match self {
            Node::Leaf(items) => {
                let mut env = Envelope::EMPTY;
                for (e, _) in items {
                    env.expand_to_include(e);
                }
                env
            }
            Node::Internal { envelope, .. } => *envelope,
        }
    }

    fn query<'a>(&'a self, q: &Envelope, out: &mut Vec<&'a T>) {
        if !self.envelope().intersects(q) {
            return;
        }
        match self {
            Node::Leaf(items) => {
                for (env, value) in items {
                    if env.intersects(q) {
                        out.push(value);
                    }
                }
            }
            Node::Internal { children, .. } => {
                for c in children {
                    c.query(q, out);
                }
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Node::Leaf(items) => items.len(),
            Node::Internal { children, .. } => children.iter().map(Node::len).sum(),
        }
    }
}

/// Static, bulk-loaded R-tree keyed by item envelopes. Build is
/// `O(n log n)`; query is `O(log n + k)` expected for spatially clustered
/// inputs.
pub struct HPRtree<T> {
    root: Option<Node<T>>,
    node_capacity: usize,
}

impl<T: Clone> HPRtree<T> {
    /// Bulk-loads an index from `items`, each an `(envelope, value)` pair,
    /// using the default node capacity.
    pub fn bulk_load(items: Vec<(Envelope, T)>) -> Self {
        Self::bulk_load_with_capacity(items, DEFAULT_NODE_CAPACITY)
    }

    pub fn bulk_load_with_capacity(items: Vec<(Envelope, T)>, node_capacity: usize) -> Self {
        let node_capacity = node_capacity.max(1);
        if items.is_empty() {
            return Self {
                root: None,
                node_capacity,
            };
        }

        // global extent, for mapping item centroids onto the Hilbert grid.
        let mut extent = Envelope::EMPTY;
        for (env, _) in &items {
            extent.expand_to_include(env);
        }

        let mut sortable: Vec<(u64, Envelope, T)> = items
            .into_iter()
            .map(|(env, v)| {
                let (cx, cy) = env.center();
                let code = hilbert_code_for(
                    cx,
                    cy,
                    extent.min_x,
                    extent.max_x,
                    extent.min_y,
                    extent.max_y,
                );
                (code, env, v)
            })
            .collect();
        sortable.sort_by_key(|(code, _, _)| *code);

        let leaves: Vec<Node<T>> = sortable
            .into_iter()
            .map(|(_, env, v)| (env, v))
            .collect::<Vec<_>>()
            .chunks(node_capacity)
            .map(|chunk| Node::Leaf(chunk.to_vec()))
            .collect();

        let root = pack_levels(leaves, node_capacity);
        Self {
            root: Some(root),
            node_capacity,
        }
    }

    /// All values whose stored envelope intersects `query`.
    pub fn query(&self, query: &Envelope) -> Vec<&T> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.query(query, &mut out);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.root.as_ref().map(Node::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }
}

/// Recursively packs a level of nodes into parents of `node_capacity`
/// children until a single root remains. Every internal node's envelope is
/// the union of its children's.
fn pack_levels<T>(level: Vec<Node<T>>, node_capacity: usize) -> Node<T> {
    let mut current = level;
    while current.len() > 1 {
        let mut next_level = Vec::with_capacity(current.len().div_ceil(node_capacity));
        let mut drained = current.into_iter();
        loop {
            let chunk: Vec<Node<T>> = (&mut drained).take(node_capacity).collect();
            if chunk.is_empty() {
                break;
            }
            let mut envelope = Envelope::EMPTY;
            for c in &chunk {
                envelope.expand_to_include(&c.envelope());
            }
            next_level.push(Node::Internal {
                envelope,
                children: chunk,
            });
        }
        current = next_level;
    }
    current.into_iter().next().expect("non-empty input guaranteed by caller")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Envelope {
        Envelope::new(min_x, max_x, min_y, max_y)
    }

    #[test]
    fn s3_ten_region_insert_and_query() {
        let regions = vec![
            env(10.0, 10.0, 20.0, 20.0),
            env(5.0, 5.0, 15.0, 15.0),
            env(25.0, 25.0, 35.0, 35.0),
            env(5.0, 5.0, 17.0, 15.0),
            env(5.0, 25.0, 25.0, 35.0),
            env(25.0, 5.0, 35.0, 15.0),
            env(2.0, 2.0, 4.0, 4.0),
        ];
        let items: Vec<(Envelope, usize)> =
            regions.iter().enumerate().map(|(i, e)| (*e, i)).collect();
        let tree = HPRtree::bulk_load_with_capacity(items, 10);

        let query = env(5.0, 5.0, 10.0, 10.0);
        let expected: Vec<usize> = regions
            .iter()
            .enumerate()
            .filter(|(_, e)| e.intersects(&query))
            .map(|(i, _)| i)
            .collect();

        let mut got: Vec<usize> = tree.query(&query).into_iter().copied().collect();
        got.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn empty_tree_returns_no_hits() {
        let tree: HPRtree<usize> = HPRtree::bulk_load(Vec::new());
        assert!(tree.query(&env(0.0, 0.0, 1.0, 1.0)).is_empty());
    }
}
