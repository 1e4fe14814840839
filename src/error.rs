use crate::hmm::HmmError;
use crate::io::IoError;

/// Crate-level error, composed from each module area's own error type
/// (§1 ambient stack). The CLI harness is the only caller that needs this
/// union; library callers generally work with the narrower per-module
/// errors directly.
#[derive(thiserror::Error, Debug)]
pub enum MatchError {
    #[error(transparent)]
    Hmm(#[from] HmmError),
    #[error(transparent)]
    Io(#[from] IoError),
}
