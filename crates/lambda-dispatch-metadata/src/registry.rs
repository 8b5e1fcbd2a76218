//! Metadata registry
//!
//! Process-scoped storage of service, event-handler, parameter-binding and
//! error-handler metadata, keyed by [`ClassId`]. Populated through `&mut self`
//! during a single-threaded startup phase, then shared read-only (typically
//! behind an `Arc`) by every invocation.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::RegistryError;
use crate::event::EventSpec;
use crate::middleware::{SharedErrorHandler, SharedMiddleware};
use crate::param::ParamBinding;
use crate::service::ServiceDescriptor;
use crate::value::ClassId;

/// Events and middleware declared for one (class, method) pair
#[derive(Clone)]
pub struct EventHandlerDescriptor {
    pub class: ClassId,
    pub method: String,
    pub events: Vec<EventSpec>,
    pub middleware: Vec<SharedMiddleware>,
}

impl fmt::Debug for EventHandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlerDescriptor")
            .field("class", &self.class)
            .field("method", &self.method)
            .field("events", &self.events)
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

/// A binding for one positional parameter of a handler method
#[derive(Debug, Clone)]
pub struct ParamBindingDescriptor {
    pub class: ClassId,
    pub method: String,
    pub index: usize,
    pub binding: ParamBinding,
}

#[derive(Clone)]
pub struct ErrorHandlerDescriptor {
    pub class: ClassId,
    pub handler: SharedErrorHandler,
}

impl fmt::Debug for ErrorHandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlerDescriptor")
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct ClassMetadata {
    service: Option<ServiceDescriptor>,
    handlers: Vec<EventHandlerDescriptor>,
    params: Vec<ParamBindingDescriptor>,
    error_handler: Option<ErrorHandlerDescriptor>,
}

/// Registry of all declared metadata
#[derive(Default)]
pub struct MetadataRegistry {
    classes: HashMap<ClassId, ClassMetadata>,
    /// Service classes in registration order
    service_order: Vec<ClassId>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the service descriptor of a class
    pub fn register_service(
        &mut self,
        class: ClassId,
        descriptor: ServiceDescriptor,
    ) -> Result<(), RegistryError> {
        let entry = self.classes.entry(class).or_default();
        if entry.service.is_some() {
            return Err(RegistryError::DuplicateService(class));
        }
        debug!(
            class = %class,
            service = %descriptor.name,
            handlers = descriptor.handlers.len(),
            "Registered service"
        );
        entry.service = Some(descriptor);
        self.service_order.push(class);
        Ok(())
    }

    /// Register events and middleware for a handler method
    ///
    /// Repeated registrations for the same (class, method) append to the
    /// existing entry in call order; a new method gets its own entry.
    pub fn register_handler(
        &mut self,
        class: ClassId,
        method: &str,
        events: Vec<EventSpec>,
        middleware: Vec<SharedMiddleware>,
    ) {
        let entry = self.classes.entry(class).or_default();
        debug!(
            class = %class,
            method,
            events = events.len(),
            middleware = middleware.len(),
            "Registered event handler"
        );
        match entry.handlers.iter_mut().find(|h| h.method == method) {
            Some(existing) => {
                existing.events.extend(events);
                existing.middleware.extend(middleware);
            }
            None => entry.handlers.push(EventHandlerDescriptor {
                class,
                method: method.to_string(),
                events,
                middleware,
            }),
        }
    }

    /// Bind a positional parameter of a handler method
    pub fn register_param(
        &mut self,
        class: ClassId,
        method: &str,
        index: usize,
        binding: ParamBinding,
    ) -> Result<(), RegistryError> {
        let entry = self.classes.entry(class).or_default();
        if entry
            .params
            .iter()
            .any(|p| p.method == method && p.index == index)
        {
            return Err(RegistryError::DuplicateParam {
                class,
                method: method.to_string(),
                index,
            });
        }
        debug!(class = %class, method, index, kind = binding.source.kind(), "Registered parameter");
        entry.params.push(ParamBindingDescriptor {
            class,
            method: method.to_string(),
            index,
            binding,
        });
        Ok(())
    }

    /// Register the error handler of a class
    pub fn register_error_handler(
        &mut self,
        class: ClassId,
        handler: SharedErrorHandler,
    ) -> Result<(), RegistryError> {
        let entry = self.classes.entry(class).or_default();
        if entry.error_handler.is_some() {
            return Err(RegistryError::DuplicateErrorHandler(class));
        }
        debug!(class = %class, "Registered error handler");
        entry.error_handler = Some(ErrorHandlerDescriptor { class, handler });
        Ok(())
    }

    pub fn service(&self, class: ClassId) -> Option<&ServiceDescriptor> {
        self.classes.get(&class).and_then(|m| m.service.as_ref())
    }

    /// All registered services in registration order
    pub fn services(&self) -> impl Iterator<Item = (ClassId, &ServiceDescriptor)> + '_ {
        self.service_order
            .iter()
            .filter_map(|class| self.service(*class).map(|s| (*class, s)))
    }

    /// Event handler entries of a class, in first-registration order
    pub fn handlers(&self, class: ClassId) -> &[EventHandlerDescriptor] {
        self.classes
            .get(&class)
            .map(|m| m.handlers.as_slice())
            .unwrap_or_default()
    }

    pub fn handler(&self, class: ClassId, method: &str) -> Option<&EventHandlerDescriptor> {
        self.handlers(class).iter().find(|h| h.method == method)
    }

    pub fn params(&self, class: ClassId) -> &[ParamBindingDescriptor] {
        self.classes
            .get(&class)
            .map(|m| m.params.as_slice())
            .unwrap_or_default()
    }

    pub fn params_for<'a>(
        &'a self,
        class: ClassId,
        method: &'a str,
    ) -> impl Iterator<Item = &'a ParamBindingDescriptor> + 'a {
        self.params(class).iter().filter(move |p| p.method == method)
    }

    /// Middleware of a method, flattened across all of its handler entries in registration order
    pub fn middleware_for(&self, class: ClassId, method: &str) -> Vec<SharedMiddleware> {
        self.handlers(class)
            .iter()
            .filter(|h| h.method == method)
            .flat_map(|h| h.middleware.iter().cloned())
            .collect()
    }

    pub fn error_handler(&self, class: ClassId) -> Option<&ErrorHandlerDescriptor> {
        self.classes
            .get(&class)
            .and_then(|m| m.error_handler.as_ref())
    }

    /// Number of classes with any metadata
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("classes", &self.classes.len())
            .field("services", &self.service_order)
            .finish()
    }
}
