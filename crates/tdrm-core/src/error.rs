use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Family pattern must not be empty")]
    EmptyPattern,

    #[error("Invalid family pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid task definition ARN: {0}")]
    InvalidArn(String),

    #[error("Invalid format name: {0}")]
    InvalidOutputFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
