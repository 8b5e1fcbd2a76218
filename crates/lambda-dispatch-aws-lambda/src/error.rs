//! Error handling for the Lambda integration

use lambda_dispatch::DispatchError;
use lambda_dispatch_manifest::ManifestError;
use lambda_dispatch_metadata::RegistryError;
use thiserror::Error;

/// Result type for Lambda dispatch operations
pub type Result<T> = std::result::Result<T, LambdaError>;

/// Errors that can occur while building or running a Lambda dispatch server
#[derive(Error, Debug)]
pub enum LambdaError {
    /// Metadata registration failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Function naming or manifest generation failed
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Dispatching the invocation failed
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// No generated function matches the invoked one
    #[error("No route for function '{0}'")]
    RouteNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
