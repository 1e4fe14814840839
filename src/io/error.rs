use crate::geometry::GeometryError;

/// Errors raised while reading the peripheral WKT/CSV input formats (§4.8).
/// Not part of the matcher's own error surface — these live at the
/// boundary the CLI harness sits behind.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("line {line}: expected a LINESTRING, got: {text}")]
    UnsupportedGeometry { line: usize, text: String },
    #[error("line {line}: malformed row: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
