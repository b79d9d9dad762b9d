use thiserror::Error;

#[derive(Error, Debug)]
pub enum PineconeError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("NotFound: {0}")]
    NotFound(String),
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl PineconeError {
    /// Maps a non-success HTTP status plus body to the matching error variant.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound(body),
            _ => Self::ResponseError(format!("{}: {}", status, body)),
        }
    }
}
