use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavtreeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Malformed entry at {path}: {message}")]
    Shape { path: String, message: String },
    #[error("Missing variable: {0}")]
    MissingVariable(String),
    #[error("Unresolved script: {0}")]
    UnresolvedScript(String),
    #[error("Deferred scripts nested deeper than {0} levels")]
    DepthLimit(usize),
}

impl NavtreeError {
    pub(crate) fn shape(path: &[usize], message: impl Into<String>) -> Self {
        NavtreeError::Shape {
            path: crate::model::format_path(path),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NavtreeError>;
