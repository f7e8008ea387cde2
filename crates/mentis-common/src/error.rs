use thiserror::Error;

#[derive(Debug, Error)]
pub enum MentisError {
    #[error("Unknown component label: {0}")]
    Label(String),

    #[error("Empty term rejected")]
    EmptyTerm,

    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MentisError>;
