/// Convenience result type used across splashgif.
pub type SplashResult<T> = Result<T, SplashError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// A tag name that does not look like a release is not an error: version extraction returns
/// `None` for it and the tag is skipped silently.
#[derive(thiserror::Error, Debug)]
pub enum SplashError {
    /// A listing page or asset request failed (network error, timeout or non-success status).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// An image could not be decoded, resized or encoded.
    #[error("image error: {0}")]
    Image(String),

    /// Nothing left to work with (no versions enumerated, no assets downloaded).
    #[error("no data: {0}")]
    NoData(String),

    /// Invalid configuration or input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SplashError {
    /// Build a [`SplashError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`SplashError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`SplashError::NoData`] value.
    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    /// Build a [`SplashError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
