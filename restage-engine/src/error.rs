use thiserror::Error;

/// Failure taxonomy of review actions. None of these are fatal; every failure
/// path leaves the engine in the state it held before the action started.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caught locally before any store call is made (empty selection,
    /// already-processed record, unconfirmed delete).
    #[error("{0}")]
    Validation(String),

    /// A store call failed. The message is the store's, passed through
    /// verbatim.
    #[error("{0}")]
    Remote(String),

    /// A re-fetch after a committed mutation failed; the view is stale but the
    /// mutation itself succeeded server-side.
    #[error("{0}")]
    Refresh(String),
}
