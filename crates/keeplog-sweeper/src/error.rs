use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweeperError {
    #[error("log rotation failed: {0}")]
    Rotator(#[from] keeplog_rotator::RotatorError),

    #[error(transparent)]
    Store(#[from] keeplog_store::StoreError),

    #[error("rotation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SweeperError>;
