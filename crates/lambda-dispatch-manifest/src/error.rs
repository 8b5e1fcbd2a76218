//! Error types for naming and manifest generation

use lambda_dispatch_metadata::ClassId;
use thiserror::Error;

/// Function name resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("Function name prefix '{prefix}' is {length} characters, the limit is {max}")]
    PrefixTooLong {
        prefix: String,
        length: usize,
        max: usize,
    },

    #[error("Function name '{name}' is {length} characters, the limit is {max}; enable trimming to shorten it")]
    FunctionNameTooLong {
        name: String,
        length: usize,
        max: usize,
    },

    #[error("Function name prefix '{prefix}' leaves {remaining} characters, not enough to trim into")]
    NotEnoughRoomToTrim { prefix: String, remaining: usize },
}

/// Manifest generation failures
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error("Function name '{name}' is resolved by both {first} and {second}")]
    DuplicateFunctionName {
        name: String,
        first: String,
        second: String,
    },

    #[error("No service is registered")]
    NoService,

    #[error("Expected exactly one service, found {}", .0.len())]
    MultipleServices(Vec<ClassId>),

    #[error("Service '{0}' is not registered")]
    ServiceNotFound(ClassId),

    #[error("Failed to render manifest: {0}")]
    Render(#[from] serde_yml::Error),
}

pub type Result<T> = std::result::Result<T, ManifestError>;
