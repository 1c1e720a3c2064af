use thiserror::Error;

/// Errors a client callback may report when a composed record
/// could not be delivered. The adapter logs them and moves on:
/// delivery is never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    /// Transport level failure (remote end died, marshaling issue..)
    #[error("transport error: {0}")]
    Transport(String),

    /// Client explicitly rejected the record
    #[error("record rejected by client")]
    Rejected,
}

/// Status returned by every registration entry point.
/// Registration has no failure path at this layer.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    #[default]
    Success,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
        }
    }
}
