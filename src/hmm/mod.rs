//! Hidden-Markov-model map matching (§4.6): candidate edges scored by an
//! emission kernel, connected by pluggable transition penalties, decoded
//! with Viterbi, and stitched into a single route by `postprocess`.

mod config;
mod emission;
mod error;
mod matcher;
mod postprocess;
mod prefilter;
mod transition;
mod viterbi;

pub use config::HmmConfig;
pub use emission::EmissionKernel;
pub use error::HmmError;
pub use matcher::{MatchResult, Matcher};
pub use postprocess::{concatenate_path, connect, drop_nulls};
pub use prefilter::prefilter;
pub use transition::TransitionPlugin;
pub use viterbi::{build_columns, decode, Column};
