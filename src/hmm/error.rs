use crate::geometry::GeometryError;
use crate::graph::GraphError;
use crate::search::SearchError;
use crate::topology::TopologyError;

/// Errors raised while matching a trajectory. A fully pruned trellis is
/// *not* one of these — §4.6.4's restart rule handles it internally — nor
/// is "no path" from A*, which the postprocessor treats as a gap to log
/// and skip, not a hard failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HmmError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("observation sequence is empty")]
    EmptyTrajectory,
}
