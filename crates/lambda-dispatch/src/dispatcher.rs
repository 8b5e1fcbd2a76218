//! Dispatch engine
//!
//! One invocation runs as a single sequential pipeline:
//!
//! 1. **Receive**: look up the handler by name and the method on it
//! 2. **Pre hook**: the owning service's `pre_handle`
//! 3. **Middleware**: the method's middleware, in registration order
//! 4. **Bind**: build the positional arguments
//! 5. **Invoke**: call the method
//! 6. **Post hook**: the owning service's `post_handle` replaces the result
//!
//! A failure in steps 2 to 6 stops the pipeline and is recovered in one
//! place: the class's error handler first, then the status-code response
//! convention, and otherwise the failure is returned as is.

use std::fmt;
use std::sync::Arc;

use lambda_dispatch_metadata::{ClassId, HandlerError, HandlerResult, MetadataRegistry, Value};
use tracing::{debug, error, warn};

use crate::binder::bind_params;
use crate::container::Container;
use crate::error::{DispatchError, Result};
use crate::handler::{EventHandler, MethodSignature};
use crate::response::HttpResponse;
use crate::service::{Service, SharedService};

/// Routes invocations to handler methods
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<MetadataRegistry>,
    container: Arc<dyn Container>,
}

impl Dispatcher {
    pub fn new(registry: Arc<MetadataRegistry>, container: Arc<dyn Container>) -> Self {
        Self {
            registry,
            container,
        }
    }

    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    pub fn container(&self) -> &dyn Container {
        self.container.as_ref()
    }

    /// The bound service whose descriptor declares the handler class
    pub fn owning_service(&self, class: ClassId) -> Option<SharedService> {
        self.container.services().into_iter().find(|service| {
            self.registry
                .service(service.class_id())
                .is_some_and(|descriptor| descriptor.declares_handler(class))
        })
    }

    /// Dispatch one invocation to `handler_name.method`
    pub async fn handle(
        &self,
        method: &str,
        handler_name: &str,
        mut event: Value,
        mut context: Value,
    ) -> Result<Value> {
        let handler = self
            .container
            .handler(handler_name)
            .ok_or_else(|| DispatchError::HandlerNotFound(handler_name.to_string()))?;
        let class = handler.class_id();

        let Some(signature) = handler.method(method) else {
            warn!(handler = %class, method, "Method for event handler not found");
            return Err(DispatchError::MethodNotFound {
                handler: handler_name.to_string(),
                method: method.to_string(),
            });
        };

        let service = self.owning_service(class);
        if service.is_none() {
            debug!(handler = %class, "No owning service bound, hooks skipped");
        }
        debug!(handler = %class, method, "Dispatching invocation");

        match self
            .run(
                handler.as_ref(),
                service.as_deref(),
                method,
                signature,
                &mut event,
                &mut context,
            )
            .await
        {
            Ok(result) => Ok(result),
            Err(err) => {
                self.recover(class, method, service.as_deref(), err, &event, &context)
                    .await
            }
        }
    }

    /// Callback form of [`handle`](Self::handle); the callback runs exactly once
    pub async fn handle_with_callback<F>(
        &self,
        method: &str,
        handler_name: &str,
        event: Value,
        context: Value,
        callback: F,
    ) where
        F: FnOnce(Option<DispatchError>, Option<Value>),
    {
        match self.handle(method, handler_name, event, context).await {
            Ok(response) => callback(None, Some(response)),
            Err(err) => callback(Some(err), None),
        }
    }

    async fn run(
        &self,
        handler: &dyn EventHandler,
        service: Option<&dyn Service>,
        method: &str,
        signature: MethodSignature,
        event: &mut Value,
        context: &mut Value,
    ) -> HandlerResult<Value> {
        if let Some(service) = service {
            service.pre_handle(event, context).await?;
        }

        let class = handler.class_id();
        for middleware in self.registry.middleware_for(class, method) {
            middleware.handle(event, context).await?;
        }

        let args = bind_params(&self.registry, class, method, signature.arity, event, context)?;
        let result = handler.invoke(method, args).await?;

        match service {
            Some(service) => service.post_handle(event, context, result).await,
            None => Ok(result),
        }
    }

    async fn recover(
        &self,
        class: ClassId,
        method: &str,
        service: Option<&dyn Service>,
        err: HandlerError,
        event: &Value,
        context: &Value,
    ) -> Result<Value> {
        if let Some(descriptor) = self.registry.error_handler(class) {
            if let Some(response) = descriptor.handler.handle(&err).await {
                debug!(handler = %class, method, error = %err, "Error handler produced a response");
                return Ok(response);
            }
        }

        if let Some(status_code) = err.status_code() {
            debug!(handler = %class, method, status_code, error = %err, "Responding with status code");
            let response = HttpResponse::message(status_code, err.message()).into_value();
            return match service {
                Some(service) => service
                    .post_handle(event, context, response)
                    .await
                    .map_err(DispatchError::Fault),
                None => Ok(response),
            };
        }

        error!(handler = %class, method, error = %err, "Event handler failed");
        Err(DispatchError::Handler(err))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
