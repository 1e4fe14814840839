//! Spatial indices used to prefilter candidate road edges near a GPS
//! observation: a static Hilbert-packed R-tree over edge envelopes, and a
//! balanced k-d tree over node coordinates, both built once per road graph.

mod error;
mod hilbert;
mod hprtree;
mod kdtree;

pub use error::SpatialIndexError;
pub use hprtree::{HPRtree, DEFAULT_NODE_CAPACITY};
pub use kdtree::KdTree;
