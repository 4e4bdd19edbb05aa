use thiserror::Error;

/// Errors that can occur when communicating with a Nomen node.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("node rejected request (status {status}, code {code}): {message}")]
    ServerError {
        status: u16,
        code: String,
        message: String,
    },
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    pub(crate) fn parse_error(msg: impl Into<String>) -> Self {
        ClientError::Parse(msg.into())
    }

    pub(crate) fn server_error(
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ClientError::ServerError {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// True when the node processed the request and refused it, as opposed to
    /// the node being unreachable. Rejections are final; re-submitting the
    /// same transaction will not change the outcome.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::ServerError { .. })
    }
}
