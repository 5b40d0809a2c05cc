use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotatorError {
    #[error("interrupted while deleting {0}")]
    Interrupted(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other failure of a store implementation.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RotatorError>;
