//! Error types and handling for the tourism agent

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Classification of provider failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Connection refused, DNS failure or an unexpected status
    ApiNetworkError,
    /// The provider answered with a body we could not interpret
    ApiInvalidResponse,
    /// HTTP 429 from the provider
    ApiRateLimit,
    /// HTTP 404 from the provider
    ApiLocationNotFound,
    /// The per-call timeout elapsed
    ApiTimeout,
    /// HTTP 5xx from the provider
    ApiServerError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ApiNetworkError => "api_network_error",
            ErrorCode::ApiInvalidResponse => "api_invalid_response",
            ErrorCode::ApiRateLimit => "api_rate_limit",
            ErrorCode::ApiLocationNotFound => "api_location_not_found",
            ErrorCode::ApiTimeout => "api_timeout",
            ErrorCode::ApiServerError => "api_server_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the tourism agent
#[derive(Error, Debug)]
pub enum TourismError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Provider communication errors
    #[error("API error ({code}): {message}")]
    Api {
        message: String,
        code: ErrorCode,
        context: HashMap<String, String>,
    },
}

impl TourismError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error carrying request details for diagnostics
    pub fn api_with_context<S: Into<String>>(
        message: S,
        code: ErrorCode,
        context: HashMap<String, String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            code,
            context,
        }
    }

    /// Provider error code, if this is an API error
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            TourismError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TourismError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            TourismError::Api {
                code: ErrorCode::ApiRateLimit,
                ..
            } => "The upstream service is rate limiting requests. Please try again later."
                .to_string(),
            TourismError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(message: &str, code: ErrorCode) -> TourismError {
        TourismError::api_with_context(message, code, HashMap::new())
    }

    #[test]
    fn test_error_creation() {
        let config_err = TourismError::config("missing port");
        assert!(matches!(config_err, TourismError::Config { .. }));
        assert_eq!(config_err.code(), None);

        let api_err = api("connection failed", ErrorCode::ApiNetworkError);
        assert!(matches!(api_err, TourismError::Api { .. }));
        assert_eq!(api_err.code(), Some(ErrorCode::ApiNetworkError));
    }

    #[test]
    fn test_user_messages() {
        let config_err = TourismError::config("Server port cannot be 0");
        assert_eq!(
            config_err.user_message(),
            "Configuration error: Server port cannot be 0. Please check your config file."
        );

        let timeout = api("test", ErrorCode::ApiTimeout);
        assert!(timeout.user_message().contains("Unable to connect"));

        let limited = api("test", ErrorCode::ApiRateLimit);
        assert!(limited.user_message().contains("rate limiting"));
    }

    #[test]
    fn test_api_error_display_includes_code() {
        let err = api("bad gateway", ErrorCode::ApiServerError);
        assert_eq!(err.to_string(), "API error (api_server_error): bad gateway");
    }

    #[test]
    fn test_api_error_keeps_context() {
        let context = HashMap::from([("coordinates".to_string(), "48.8589,2.3200".to_string())]);
        let err = TourismError::api_with_context("timed out", ErrorCode::ApiTimeout, context);
        let TourismError::Api { context, .. } = err else {
            panic!("expected an API error");
        };
        assert_eq!(context["coordinates"], "48.8589,2.3200");
    }
}
