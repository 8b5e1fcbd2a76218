//! Annotation layer
//!
//! Builders that turn declarations into registry entries. A handler class
//! declares its metadata once, at startup, either by applying builders
//! directly or through the fluent [`ClassAnnotator`] / [`MethodAnnotator`]:
//!
//! ```rust
//! use lambda_dispatch_metadata::prelude::*;
//! use lambda_dispatch_metadata::param::parsers;
//!
//! struct OrderHandler;
//!
//! impl Annotated for OrderHandler {
//!     fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError> {
//!         let mut class = registry.annotate::<Self>();
//!         class
//!             .method("list")
//!             .handler(Handler::http("/orders", HttpMethod::Get))
//!             .param(0, Param::query("page").parse_with(parsers::integer()))?;
//!         class
//!             .method("archive")
//!             .handler(Handler::schedule("rate(1 day)", ScheduleOptions::default()));
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), RegistryError> {
//! let mut registry = MetadataRegistry::new();
//! registry.register::<OrderHandler>()?;
//! assert_eq!(registry.handlers(ClassId::of::<OrderHandler>()).len(), 2);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{HandlerResult, RegistryError};
use crate::event::{
    EventSpec, HttpEvent, HttpMethod, IotEvent, ObjectStorageEvent, ScheduleEvent, ScheduleOptions,
};
use crate::middleware::{SharedErrorHandler, SharedMiddleware};
use crate::param::{ParamBinding, ParamSource, ParseFn};
use crate::registry::MetadataRegistry;
use crate::service::ServiceDescriptor;
use crate::value::ClassId;

/// Static metadata declaration of a handler or service class
pub trait Annotated {
    fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError>;
}

impl MetadataRegistry {
    /// Start annotating the class identified by a Rust type
    pub fn annotate<T: ?Sized + 'static>(&mut self) -> ClassAnnotator<'_> {
        self.annotate_class(ClassId::of::<T>())
    }

    pub fn annotate_class(&mut self, class: ClassId) -> ClassAnnotator<'_> {
        ClassAnnotator {
            registry: self,
            class,
        }
    }

    /// Run a class's static annotation routine
    pub fn register<T: Annotated>(&mut self) -> Result<&mut Self, RegistryError> {
        T::annotate(self)?;
        Ok(self)
    }
}

/// Class-level annotation target
pub struct ClassAnnotator<'r> {
    registry: &'r mut MetadataRegistry,
    class: ClassId,
}

impl ClassAnnotator<'_> {
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Declare the class as the root of a service
    pub fn service(&mut self, descriptor: ServiceDescriptor) -> Result<&mut Self, RegistryError> {
        self.registry.register_service(self.class, descriptor)?;
        Ok(self)
    }

    /// Attach the class-wide error handler
    pub fn error_handler(&mut self, handler: SharedErrorHandler) -> Result<&mut Self, RegistryError> {
        self.registry.register_error_handler(self.class, handler)?;
        Ok(self)
    }

    /// Annotate one method of the class
    pub fn method(&mut self, name: &str) -> MethodAnnotator<'_> {
        MethodAnnotator {
            registry: &mut *self.registry,
            class: self.class,
            method: name.to_string(),
        }
    }
}

/// Method-level annotation target
pub struct MethodAnnotator<'r> {
    registry: &'r mut MetadataRegistry,
    class: ClassId,
    method: String,
}

impl MethodAnnotator<'_> {
    /// Attach events and middleware; repeated calls accumulate
    pub fn handler(&mut self, handler: Handler) -> &mut Self {
        handler.apply(self.registry, self.class, &self.method);
        self
    }

    /// Bind the parameter at `index`
    pub fn param(&mut self, index: usize, param: Param) -> Result<&mut Self, RegistryError> {
        param.apply(self.registry, self.class, &self.method, index)?;
        Ok(self)
    }
}

/// One entry of a generic handler declaration: a raw event map plus its middleware
#[derive(Clone, Default)]
pub struct CustomEvent {
    pub event_map: Map<String, Value>,
    pub middleware: Vec<SharedMiddleware>,
}

impl CustomEvent {
    pub fn new(event_map: Map<String, Value>) -> Self {
        Self {
            event_map,
            middleware: Vec::new(),
        }
    }

    pub fn middleware(mut self, middleware: SharedMiddleware) -> Self {
        self.middleware.push(middleware);
        self
    }
}

/// Event-handler declaration: event source(s) plus middleware
#[derive(Clone)]
pub struct Handler {
    events: Vec<EventSpec>,
    middleware: Vec<SharedMiddleware>,
}

impl Handler {
    fn single(event: EventSpec) -> Self {
        Self {
            events: vec![event],
            middleware: Vec::new(),
        }
    }

    pub fn http(path: impl Into<String>, method: HttpMethod) -> Self {
        Self::http_with_options(path, method, Map::new())
    }

    pub fn http_with_options(
        path: impl Into<String>,
        method: HttpMethod,
        options: Map<String, Value>,
    ) -> Self {
        Self::single(EventSpec::Http(HttpEvent {
            path: path.into(),
            method,
            options,
        }))
    }

    /// Object storage (S3) notification
    pub fn s3(bucket: impl Into<String>, event: impl Into<String>) -> Self {
        Self::single(EventSpec::S3(ObjectStorageEvent {
            bucket: bucket.into(),
            event: event.into(),
        }))
    }

    pub fn iot(sql: impl Into<String>, name: impl Into<String>) -> Self {
        Self::single(EventSpec::Iot(IotEvent {
            sql: sql.into(),
            name: name.into(),
        }))
    }

    pub fn schedule(rate: impl Into<String>, options: ScheduleOptions) -> Self {
        Self::single(EventSpec::Schedule(ScheduleEvent {
            rate: rate.into(),
            options,
        }))
    }

    pub fn custom(event_map: Map<String, Value>) -> Self {
        Self::single(EventSpec::Custom(event_map))
    }

    /// Several raw events at once; their middleware lists are concatenated in order
    pub fn custom_many(entries: impl IntoIterator<Item = CustomEvent>) -> Self {
        let mut handler = Self {
            events: Vec::new(),
            middleware: Vec::new(),
        };
        for entry in entries {
            handler.events.push(EventSpec::Custom(entry.event_map));
            handler.middleware.extend(entry.middleware);
        }
        handler
    }

    pub fn middleware(mut self, middleware: SharedMiddleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn with_middleware(mut self, middleware: impl IntoIterator<Item = SharedMiddleware>) -> Self {
        self.middleware.extend(middleware);
        self
    }

    pub fn events(&self) -> &[EventSpec] {
        &self.events
    }

    /// Merge this declaration into the (class, method) entry
    pub fn apply(self, registry: &mut MetadataRegistry, class: ClassId, method: &str) {
        registry.register_handler(class, method, self.events, self.middleware);
    }
}

/// Parameter declaration
#[derive(Debug, Clone)]
pub struct Param {
    binding: ParamBinding,
}

impl Param {
    fn from_source(source: ParamSource) -> Self {
        Self {
            binding: ParamBinding::new(source),
        }
    }

    /// Query-string parameter
    pub fn query(key: impl Into<String>) -> Self {
        Self::from_source(ParamSource::Query(key.into()))
    }

    /// Path parameter
    pub fn path(key: impl Into<String>) -> Self {
        Self::from_source(ParamSource::Path(key.into()))
    }

    /// Field of the request body
    pub fn body(key: impl Into<String>) -> Self {
        Self::from_source(ParamSource::Body(key.into()))
    }

    pub fn event() -> Self {
        Self::from_source(ParamSource::Event)
    }

    pub fn context() -> Self {
        Self::from_source(ParamSource::Context)
    }

    /// Nested event value by dot path, e.g. `requestContext.authorizer.userId`
    pub fn event_value(path: impl Into<String>) -> Self {
        Self::from_source(ParamSource::EventValue(path.into()))
    }

    /// Nested context value by dot path
    pub fn context_value(path: impl Into<String>) -> Self {
        Self::from_source(ParamSource::ContextValue(path.into()))
    }

    pub fn header(key: impl Into<String>) -> Self {
        Self::from_source(ParamSource::Header(key.into()))
    }

    pub fn parse<F>(self, parse: F) -> Self
    where
        F: Fn(Value) -> HandlerResult<Value> + Send + Sync + 'static,
    {
        self.parse_with(Arc::new(parse))
    }

    pub fn parse_with(mut self, parse: ParseFn) -> Self {
        self.binding.parse = Some(parse);
        self
    }

    pub fn binding(&self) -> &ParamBinding {
        &self.binding
    }

    pub fn apply(
        self,
        registry: &mut MetadataRegistry,
        class: ClassId,
        method: &str,
        index: usize,
    ) -> Result<(), RegistryError> {
        registry.register_param(class, method, index, self.binding)
    }
}
