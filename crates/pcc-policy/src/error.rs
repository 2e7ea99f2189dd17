use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid effect: {0:?} (expected one of: ignore, alert, block, \"alert, block\")")]
    InvalidEffect(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
