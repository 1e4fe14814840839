/// Errors raised by topology calculators.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    /// Vincenty's inverse or direct iteration failed to converge, which can
    /// happen between near-antipodal points. Callers may retry with the
    /// Haversine approximation (`FactoryKind::GeoidalApproximate` on the
    /// owning [`crate::geometry::GeometryFactory`]).
    #[error("Vincenty iteration failed to converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },
    #[error("points are coincident")]
    CoincidentPoints,
}
