use thiserror::Error;

/// Errors surfaced by extraction and detection.
///
/// Normal malformed-but-finite markup never errors: missing classes, ids and
/// attributes degrade to empty values, and an empty document or an empty
/// result set is a valid outcome. Only parameter misuse and structural
/// impossibilities are reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid detection threshold {value}: must be at least 1")]
    InvalidThreshold { value: usize },

    #[error("tree depth limit {limit} exceeded at <{tag}>: child references may be cyclic")]
    TreeDepthExceeded { tag: String, limit: usize },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
