use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("service error: {0}")] Service(String),
    #[error("storage error: {0}")] Storage(String),
    #[error("generation cancelled")] Cancelled,
}
