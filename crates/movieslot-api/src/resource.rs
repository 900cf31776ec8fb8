//! `Resource` - tagged result for network-derived values.

/// State of a network-derived value as observed by a screen.
///
/// Exactly one tag is active at a time. `Error` may still carry the last
/// successful payload so callers can keep showing stale data.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    /// A request is in flight.
    Loading,
    /// The request succeeded.
    Success(T),
    /// The request failed.
    Error {
        /// Human-readable failure message.
        message: String,
        /// Previous successful payload, if one was being displayed.
        stale: Option<T>,
    },
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Resource<T> {
    /// Builds an `Error` from any error value, flattening its context chain.
    pub fn error(err: &anyhow::Error, stale: Option<T>) -> Self {
        Self::Error {
            message: format!("{err:#}"),
            stale,
        }
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns `true` for a successful result.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Payload to display: the success value or the stale value of an error.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Error { stale, .. } => stale.as_ref(),
            Self::Loading => None,
        }
    }

    /// Error message, if this is an `Error`.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Consumes the resource and returns the displayable payload.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Error { stale, .. } => stale,
            Self::Loading => None,
        }
    }
}
