/// Errors raised by the spatial indices.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SpatialIndexError {
    #[error("k-d tree bulk build would require node index {index}, which exceeds the addressable limit {limit}")]
    DepthExceeded { index: usize, limit: usize },
}
