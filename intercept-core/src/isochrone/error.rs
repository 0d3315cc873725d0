use thiserror::Error;

/// Errors from [`crate::isochrone::IsochroneProvider::isochrone`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsochroneError {
    /// The time limit was zero.
    #[error("isochrone time limit must be positive")]
    ZeroTimeLimit,
    /// The service could not be reached, timed out or answered with an error
    /// status.
    #[error("isochrone service at {url} is unavailable: {message}")]
    ServiceUnavailable {
        /// Request URL.
        url: String,
        /// Transport or status description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("invalid isochrone response: {message}")]
    InvalidResponse {
        /// Decoder message.
        message: String,
    },
    /// The response was well formed but contained no polygon.
    #[error("isochrone response contained no polygon")]
    NoPolygon,
}

impl IsochroneError {
    /// Report whether the failure lies with the remote service rather than
    /// with what it returned.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. })
    }
}
