//! # Metadata Prelude
//!
//! Common imports for declaring handler metadata.
//!
//! ```rust
//! use lambda_dispatch_metadata::prelude::*;
//! ```

pub use crate::annotate::{Annotated, ClassAnnotator, CustomEvent, Handler, MethodAnnotator, Param};
pub use crate::error::{HandlerError, HandlerResult, RegistryError};
pub use crate::event::{EventSpec, HttpMethod, ScheduleOptions};
pub use crate::middleware::{
    ErrorHandler, Middleware, SharedErrorHandler, SharedMiddleware, error_handler_fn, middleware_fn,
};
pub use crate::param::{ParamSource, parsers};
pub use crate::registry::MetadataRegistry;
pub use crate::service::{IamStatement, ProviderConfig, ResourceDeclaration, ServiceDescriptor};
pub use crate::value::ClassId;

pub use serde_json::Value;
