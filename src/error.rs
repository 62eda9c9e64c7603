use thiserror::Error;

/// Errors raised while building a base string or computing a signature.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The signature method has no implementation in this crate.
    #[error("unsupported signature method: {0}")]
    UnsupportedSignatureMethod(String),

    /// A parameter with an empty or whitespace-only name or value.
    #[error("invalid parameter {name:?}: name and value must not be blank")]
    InvalidParameter { name: String },

    /// The request URL cannot be normalized.
    #[error("malformed url {url:?}: {reason}")]
    MalformedUrl { url: String, reason: String },
}

impl Error {
    pub(crate) fn malformed_url(url: &str, reason: impl ToString) -> Self {
        Error::MalformedUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
