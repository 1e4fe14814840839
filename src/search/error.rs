use crate::graph::GraphError;
use crate::topology::TopologyError;

/// Errors raised while running A*. "No path exists" is *not* one of these —
/// per §7 it is returned as `Ok(None)`, not an error.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
