//! Error types used by the request executor and crate setup.
//!
//! This module defines two enums:
//!
//! - [`FetchError`]: failures of one request chain (client/server errors,
//!   transport failures, exhausted retries, hook substitutions).
//! - [`SetupError`]: failures while building clients or loading configuration.
//!
//! The controller itself never invents errors: it propagates whatever the
//! supplied function returns. Skipped and stale outcomes are not errors and are
//! reported through [`Settled`](crate::Settled) instead.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics
//! and [`FetchError`] additionally offers [`FetchError::is_retryable`] and
//! [`FetchError::status`].

use thiserror::Error;

/// # Errors produced by a request chain.
///
/// | Variant          | Retried by the default handler | Meaning                                   |
/// |------------------|--------------------------------|-------------------------------------------|
/// | `Client`         | never                          | HTTP status in `[400, 500)`               |
/// | `Server`         | yes, up to the policy          | any other non-2xx status                  |
/// | `Transport`      | yes, up to the policy          | no response at all (connect, reset, ...)  |
/// | `Exhausted`      | n/a                            | retries ran out, wraps the last failure   |
/// | `Decode`         | never                          | 2xx with a body that could not be decoded |
/// | `InvalidRequest` | never                          | descriptor could not become a request     |
/// | `Custom`         | never                          | produced by a classification hook         |
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server rejected the request (4xx). Never retried.
    #[error("client error: HTTP {status}")]
    Client {
        /// Response status code.
        status: u16,
        /// Raw response body (may be empty).
        body: String,
    },

    /// The server failed to handle the request (5xx or any other non-2xx status).
    #[error("server error: HTTP {status}")]
    Server {
        /// Response status code.
        status: u16,
        /// Raw response body (may be empty).
        body: String,
    },

    /// The request never produced a response.
    #[error("transport failure: {reason}")]
    Transport {
        /// Underlying failure message.
        reason: String,
    },

    /// The retry policy ran out; `last` is the failure of the final attempt.
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted {
        /// Total attempts performed (first attempt + retries).
        attempts: u32,
        /// Failure of the final attempt.
        #[source]
        last: Box<FetchError>,
    },

    /// A successful response carried a body that could not be decoded.
    #[error("undecodable response body: {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },

    /// The request descriptor could not be turned into a request.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// What was wrong with the descriptor.
        reason: String,
    },

    /// Failure substituted by a classification hook.
    #[error("{reason}")]
    Custom {
        /// Hook-provided message.
        reason: String,
    },
}

impl FetchError {
    /// Classifies a non-2xx status into [`FetchError::Client`] or [`FetchError::Server`].
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if (400..500).contains(&status) {
            FetchError::Client { status, body }
        } else {
            FetchError::Server { status, body }
        }
    }

    /// Shorthand for a [`FetchError::Transport`] failure.
    pub fn transport(reason: impl Into<String>) -> Self {
        FetchError::Transport {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`FetchError::Custom`] failure.
    pub fn custom(reason: impl Into<String>) -> Self {
        FetchError::Custom {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskslot::FetchError;
    ///
    /// let err = FetchError::from_status(404, "");
    /// assert_eq!(err.as_label(), "fetch_client_error");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FetchError::Client { .. } => "fetch_client_error",
            FetchError::Server { .. } => "fetch_server_error",
            FetchError::Transport { .. } => "fetch_transport_error",
            FetchError::Exhausted { .. } => "fetch_exhausted",
            FetchError::Decode { .. } => "fetch_decode_error",
            FetchError::InvalidRequest { .. } => "fetch_invalid_request",
            FetchError::Custom { .. } => "fetch_custom",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            FetchError::Client { status, body } | FetchError::Server { status, body } => {
                if body.is_empty() {
                    format!("status={status}")
                } else {
                    format!("status={status} body={body}")
                }
            }
            FetchError::Transport { reason } => format!("transport: {reason}"),
            FetchError::Exhausted { attempts, last } => {
                format!("attempts={attempts} last={}", last.as_message())
            }
            FetchError::Decode { reason } => format!("decode: {reason}"),
            FetchError::InvalidRequest { reason } => format!("invalid request: {reason}"),
            FetchError::Custom { reason } => reason.clone(),
        }
    }

    /// Indicates whether the default handler may retry this failure.
    ///
    /// Returns `true` for [`FetchError::Server`] and [`FetchError::Transport`],
    /// `false` otherwise.
    ///
    /// # Example
    /// ```
    /// use taskslot::FetchError;
    ///
    /// assert!(FetchError::from_status(503, "").is_retryable());
    /// assert!(!FetchError::from_status(400, "").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Server { .. } | FetchError::Transport { .. })
    }

    /// HTTP status carried by the failure, looking through [`FetchError::Exhausted`].
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Client { status, .. } | FetchError::Server { status, .. } => Some(*status),
            FetchError::Exhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// The innermost failure: for [`FetchError::Exhausted`] the last attempt's error,
    /// otherwise `self`.
    pub fn root(&self) -> &FetchError {
        match self {
            FetchError::Exhausted { last, .. } => last.root(),
            other => other,
        }
    }
}

/// # Errors produced while wiring the crate together.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration sources could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The HTTP client could not be constructed.
    #[error("http client error: {reason}")]
    Client {
        /// Builder failure message.
        reason: String,
    },
}

impl SetupError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SetupError::Config(_) => "setup_config",
            SetupError::Client { .. } => "setup_client",
        }
    }
}
