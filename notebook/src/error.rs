use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),
}
