use crate::topology::TopologyError;

/// Errors raised while building or querying a [`super::RoadGraph`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("merge threshold must be >= 0, got {0}")]
    NegativeMergeThreshold(f64),
    #[error("getEdgesNear requires an attached R-tree; this graph was built without one")]
    NoRtreeAttached,
    #[error("node id {0} not present in this graph")]
    UnknownNode(usize),
    #[error("edge id {0} not present in this graph")]
    UnknownEdge(usize),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Geometry(#[from] crate::geometry::GeometryError),
}
