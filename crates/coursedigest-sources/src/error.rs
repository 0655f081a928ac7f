use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Missing credentials for {0}")]
    MissingCredentials(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {service}")]
    Status { service: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;
