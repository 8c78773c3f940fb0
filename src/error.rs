use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarqueeError {
    /// A failed call to the media service: non-success status, transport
    /// failure or a body that does not have the expected shape.
    #[error("{0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for MarqueeError {
    fn from(err: reqwest::Error) -> Self {
        MarqueeError::Request(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MarqueeError>;
