//! Dispatch errors

use lambda_dispatch_metadata::{ClassId, HandlerError};
use thiserror::Error;

/// Failure surfaced by the dispatcher to its caller
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Event handler '{0}' is not bound in the container")]
    HandlerNotFound(String),

    #[error("Method for event handler not found: {handler}.{method}")]
    MethodNotFound { handler: String, method: String },

    #[error("Handler class '{handler}' of service '{service}' is not bound in the container")]
    UnboundHandler { service: String, handler: ClassId },

    /// A handler failure that no error handler or status code turned into a response
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// The service post hook failed while shaping an error response
    #[error("Post hook failed on error response: {0}")]
    Fault(#[source] HandlerError),
}

impl DispatchError {
    /// Status code carried by the underlying handler failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DispatchError::Handler(err) | DispatchError::Fault(err) => err.status_code(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DispatchError::MethodNotFound {
            handler: "UserHandler".into(),
            method: "missing".into(),
        };
        assert_eq!(err.to_string(), "Method for event handler not found: UserHandler.missing");

        let err = DispatchError::from(HandlerError::with_status(418, "teapot"));
        assert_eq!(err.to_string(), "teapot");
        assert_eq!(err.status_code(), Some(418));
        assert_eq!(DispatchError::HandlerNotFound("X".into()).status_code(), None);
    }
}
