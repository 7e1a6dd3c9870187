use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid feature count: expected {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid encoder: {0}")]
    InvalidEncoder(String),
}
