/// Vigil error types
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("malformed response body: {0}")]
    MalformedBody(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
