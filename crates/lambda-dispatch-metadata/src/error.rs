//! Error types shared by handlers, middleware and the metadata registry

use thiserror::Error;

use crate::value::ClassId;

/// Result type for handler-side operations (hooks, middleware, methods, parsers)
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Failure raised by a handler method, middleware, service hook or parse function
///
/// A `HandlerError` optionally carries an HTTP status code. The dispatcher uses
/// it to decide between a structured `{statusCode, body}` response and a raw
/// failure surfaced to the hosting platform.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    status_code: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HandlerError {
    /// Create an error without a status code
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create an error carrying an HTTP status code
    pub fn with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: Some(status_code),
            source: None,
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(400, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_status(401, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(404, message)
    }

    /// Wrap an arbitrary error, keeping its message
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            status_code: None,
            source: Some(Box::new(error)),
        }
    }

    /// Attach a status code to an existing error
    pub fn status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::from_error(err)
    }
}

/// Configuration errors raised while registering metadata
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A class may declare at most one service descriptor
    #[error("Service metadata already registered for class '{0}'")]
    DuplicateService(ClassId),

    /// A positional slot may be bound only once per method
    #[error("Parameter {index} of '{class}.{method}' is already bound")]
    DuplicateParam {
        class: ClassId,
        method: String,
        index: usize,
    },

    /// A class may declare at most one error handler
    #[error("Error handler already registered for class '{0}'")]
    DuplicateErrorHandler(ClassId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_is_optional() {
        let plain = HandlerError::new("boom");
        assert_eq!(plain.status_code(), None);
        assert_eq!(plain.to_string(), "boom");

        let unauthorized = HandlerError::unauthorized("no token");
        assert_eq!(unauthorized.status_code(), Some(401));
        assert_eq!(unauthorized.message(), "no token");
    }

    #[test]
    fn test_from_error_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HandlerError::from(json_err).status(422);
        assert_eq!(err.status_code(), Some(422));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_registry_error_messages() {
        let err = RegistryError::DuplicateParam {
            class: ClassId::new("UserHandler"),
            method: "get".to_string(),
            index: 2,
        };
        assert_eq!(err.to_string(), "Parameter 2 of 'UserHandler.get' is already bound");
    }
}
