//! # Handler Metadata for lambda-dispatch
//!
//! Declarative metadata describing a serverless service: which classes handle
//! which events, how their method parameters are bound from an invocation,
//! which middleware runs in front of them and how failures are recovered.
//!
//! ## Overview
//!
//! - [`MetadataRegistry`] - explicit, process-scoped storage keyed by [`ClassId`]
//! - [`annotate`] - builders that produce registry entries ([`Handler`], [`Param`])
//! - [`EventSpec`] / [`ParamBinding`] / [`ServiceDescriptor`] - the data model
//! - [`Middleware`] / [`ErrorHandler`] - capabilities attached to handlers
//!
//! Metadata is registered once during startup and read-only afterwards:
//!
//! ```rust
//! use lambda_dispatch_metadata::prelude::*;
//!
//! struct UserHandler;
//!
//! # fn main() -> Result<(), RegistryError> {
//! let mut registry = MetadataRegistry::new();
//! registry
//!     .annotate::<UserHandler>()
//!     .method("get_user")
//!     .handler(Handler::http("/users/{id}", HttpMethod::Get))
//!     .param(0, Param::path("id"))?
//!     .param(1, Param::context())?;
//!
//! assert_eq!(registry.handlers(ClassId::of::<UserHandler>()).len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod annotate;
pub mod error;
pub mod event;
pub mod middleware;
pub mod param;
pub mod registry;
pub mod service;
pub mod value;

pub mod prelude;

pub use annotate::{Annotated, ClassAnnotator, CustomEvent, Handler, MethodAnnotator, Param};
pub use error::{HandlerError, HandlerResult, RegistryError};
pub use event::{EventSpec, HttpEvent, HttpMethod, IotEvent, ObjectStorageEvent, ScheduleEvent, ScheduleOptions};
pub use middleware::{ErrorHandler, Middleware, SharedErrorHandler, SharedMiddleware, error_handler_fn, middleware_fn};
pub use param::{ParamBinding, ParamSource, ParseFn};
pub use registry::{ErrorHandlerDescriptor, EventHandlerDescriptor, MetadataRegistry, ParamBindingDescriptor};
pub use service::{IamStatement, ProviderConfig, ResourceDeclaration, ServiceDescriptor};
pub use value::ClassId;

/// Re-export of the structured value type used for events and contexts
pub use serde_json::Value;
