//! Node-coalescing road graph (§4.4): an arena of [`Node`]s and [`Edge`]s
//! built incrementally from candidate polylines, queryable by spatial
//! envelope once its R-tree index is built.

mod edge;
mod error;
mod node;
mod road_graph;

pub use edge::{Edge, EdgeId};
pub use error::GraphError;
pub use node::{Node, NodeId};
pub use road_graph::{RoadGraph, RoadGraphConfig};
