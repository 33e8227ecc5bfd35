use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatpressError {
    #[error("Invalid ChatGPT share URL: {0}")]
    InvalidUrl(String),

    #[error("An error occurred while extracting the conversation: {0}")]
    Extraction(String),

    #[error("Error creating PDF: {0}")]
    Render(String),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ChatpressError>;
