use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("job already exists: {0}")]
    JobAlreadyExists(String),

    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("build not found: {job} #{number}")]
    BuildNotFound { job: String, number: u32 },
}

pub type Result<T> = std::result::Result<T, StoreError>;
