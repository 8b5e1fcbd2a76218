//! Middleware and error-handler capabilities attached to handler classes

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{HandlerError, HandlerResult};

/// Middleware executed before a handler method
///
/// Middleware registered on a method runs strictly in registration order, each
/// awaited before the next starts. Mutations to the event or context are
/// visible to later middleware and to the handler. Returning an error skips
/// the remaining middleware and the method.
///
/// # Examples
///
/// ```rust
/// use lambda_dispatch_metadata::{HandlerError, HandlerResult, Middleware, Value};
/// use async_trait::async_trait;
///
/// struct RequireApiKey;
///
/// #[async_trait]
/// impl Middleware for RequireApiKey {
///     async fn handle(&self, event: &mut Value, _context: &mut Value) -> HandlerResult<()> {
///         match event.pointer("/headers/x-api-key") {
///             Some(_) => Ok(()),
///             None => Err(HandlerError::unauthorized("Missing API key")),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, event: &mut Value, context: &mut Value) -> HandlerResult<()>;
}

/// Shared middleware reference stored in handler metadata
pub type SharedMiddleware = Arc<dyn Middleware>;

/// Middleware backed by a synchronous closure
pub struct FnMiddleware<F> {
    f: F,
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut Value, &mut Value) -> HandlerResult<()> + Send + Sync,
{
    async fn handle(&self, event: &mut Value, context: &mut Value) -> HandlerResult<()> {
        (self.f)(event, context)
    }
}

/// Wrap a closure as shared middleware
pub fn middleware_fn<F>(f: F) -> SharedMiddleware
where
    F: Fn(&mut Value, &mut Value) -> HandlerResult<()> + Send + Sync + 'static,
{
    Arc::new(FnMiddleware { f })
}

/// Class-level error handler
///
/// Receives every failure of the class's methods, middleware and hooks.
/// Returning `Some(response)` replaces the failure with that response;
/// `None` falls through to the default status-code / raw-error policy.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(&self, error: &HandlerError) -> Option<Value>;
}

pub type SharedErrorHandler = Arc<dyn ErrorHandler>;

pub struct FnErrorHandler<F> {
    f: F,
}

#[async_trait]
impl<F> ErrorHandler for FnErrorHandler<F>
where
    F: Fn(&HandlerError) -> Option<Value> + Send + Sync,
{
    async fn handle(&self, error: &HandlerError) -> Option<Value> {
        (self.f)(error)
    }
}

/// Wrap a closure as a shared error handler
pub fn error_handler_fn<F>(f: F) -> SharedErrorHandler
where
    F: Fn(&HandlerError) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(FnErrorHandler { f })
}
