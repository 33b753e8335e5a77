//! Download error type.

/// Why a single URL could not be fetched. There is no retry; callers report
/// the failure and move on to the next URL.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (bad URL, timeout, connection, TLS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The final response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Creating or writing the destination file failed.
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Status code when the server answered with an error status.
    pub fn http_status(&self) -> Option<u32> {
        match self {
            FetchError::Http(code) => Some(*code),
            FetchError::Curl(_) | FetchError::Io(_) => None,
        }
    }
}
