use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdapterError>;

/// Failure taxonomy for the adapter boundary.
///
/// `Unavailable` never reaches the resolver's caller: the resolver converts
/// it into an empty tier and moves on. `UnknownEntity` is a routing signal
/// (fall through to the next tier), not a fault.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("adapter unavailable: {0}")]
    Unavailable(String),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
