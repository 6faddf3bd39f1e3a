use thiserror::Error;

/// Errors the engine can raise. Per-node SAT outcomes are never errors (see
/// [`crate::sat::SolveStatus`]) — only parameter misuse and internal
/// invariant violations surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine parameters: {0}")]
    ConfigInvalid(String),

    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}
