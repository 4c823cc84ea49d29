//! Error types.

/// Server start-up and runtime failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The listen address could not be bound.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Requested address.
        address: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}
