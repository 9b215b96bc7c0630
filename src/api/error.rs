/// Errors that can occur while calling the API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Path of the endpoint that was called.
        endpoint: &'static str,
        /// The HTTP status code.
        status: u16,
    },
}
