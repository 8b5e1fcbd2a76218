//! Named-binding lookup of services and handlers

use std::collections::HashMap;
use std::fmt;

use lambda_dispatch_metadata::MetadataRegistry;
use tracing::warn;

use crate::error::{DispatchError, Result};
use crate::handler::SharedEventHandler;
use crate::service::SharedService;

/// Source of service and handler instances
///
/// Instances are looked up by class name. Wiring them up (construction,
/// injection of their own dependencies) is the implementor's business.
pub trait Container: Send + Sync {
    /// All bound services, in binding order
    fn services(&self) -> Vec<SharedService>;

    fn service(&self, name: &str) -> Option<SharedService>;

    fn handler(&self, name: &str) -> Option<SharedEventHandler>;
}

/// Map-backed [`Container`] binding each instance under its class name
#[derive(Default, Clone)]
pub struct NamedContainer {
    services: Vec<SharedService>,
    handlers: HashMap<&'static str, SharedEventHandler>,
}

impl NamedContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a service, replacing a previous binding of the same class
    pub fn bind_service(&mut self, service: SharedService) -> &mut Self {
        let class = service.class_id();
        self.services.retain(|s| s.class_id() != class);
        self.services.push(service);
        self
    }

    /// Bind a handler under its class name, replacing a previous binding of that name
    pub fn bind_handler(&mut self, handler: SharedEventHandler) -> &mut Self {
        let name = handler.class_id().name();
        if self.handlers.insert(name, handler).is_some() {
            warn!(handler = name, "Replaced an existing handler binding with the same class name");
        }
        self
    }

    pub fn with_service(mut self, service: SharedService) -> Self {
        self.bind_service(service);
        self
    }

    pub fn with_handler(mut self, handler: SharedEventHandler) -> Self {
        self.bind_handler(handler);
        self
    }

    /// Check that every handler class declared by a bound service is bound
    pub fn verify(&self, registry: &MetadataRegistry) -> Result<()> {
        for service in &self.services {
            let class = service.class_id();
            let Some(descriptor) = registry.service(class) else {
                warn!(service = %class, "Bound service has no registered descriptor");
                continue;
            };
            if let Some(missing) = descriptor
                .handlers
                .iter()
                .find(|handler| !self.handlers.contains_key(handler.name()))
            {
                return Err(DispatchError::UnboundHandler {
                    service: descriptor.name.clone(),
                    handler: *missing,
                });
            }
        }
        Ok(())
    }
}

impl Container for NamedContainer {
    fn services(&self) -> Vec<SharedService> {
        self.services.clone()
    }

    fn service(&self, name: &str) -> Option<SharedService> {
        self.services
            .iter()
            .find(|s| s.class_id().name() == name)
            .cloned()
    }

    fn handler(&self, name: &str) -> Option<SharedEventHandler> {
        self.handlers.get(name).cloned()
    }
}

impl fmt::Debug for NamedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&&str> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("NamedContainer")
            .field(
                "services",
                &self.services.iter().map(|s| s.class_id()).collect::<Vec<_>>(),
            )
            .field("handlers", &handlers)
            .finish()
    }
}
