//! Deployment manifest generation
//!
//! Collects a service's registered handler methods into the deployment
//! descriptor shape: the service's own fields plus one function per handler
//! method, keyed by its resolved name.

use std::collections::BTreeMap;

use lambda_dispatch_metadata::{ClassId, EventSpec, MetadataRegistry, ServiceDescriptor};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ManifestError, Result};
use crate::naming::resolve_function_name;
use crate::routes::{HANDLER_ENTRY_PREFIX, Route, RouteTable};

/// Options for manifest generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Overrides the provider stage
    pub stage: Option<String>,
    /// Trim names that overflow the function name limit
    pub trim: bool,
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

/// One deployed function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    /// Entry point, `handler.<function name>`
    pub handler: String,
    pub events: Vec<EventSpec>,
    #[serde(skip)]
    pub route: Route,
}

/// Service descriptor plus its generated functions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentManifest {
    #[serde(flatten)]
    pub service: ServiceDescriptor,
    pub functions: BTreeMap<String, FunctionDefinition>,
}

impl DeploymentManifest {
    /// Generate the manifest of one registered service
    pub fn generate(
        registry: &MetadataRegistry,
        service_class: ClassId,
        options: &GeneratorOptions,
    ) -> Result<Self> {
        let mut service = registry
            .service(service_class)
            .cloned()
            .ok_or(ManifestError::ServiceNotFound(service_class))?;
        if let Some(stage) = &options.stage {
            service.provider.stage = stage.clone();
        }

        let mut functions: BTreeMap<String, FunctionDefinition> = BTreeMap::new();
        for class in &service.handlers {
            let handlers = registry.handlers(*class);
            if handlers.is_empty() {
                warn!(service = %service.name, class = %class, "Handler class declares no methods");
            }

            for handler in handlers {
                let name = resolve_function_name(
                    &service.name,
                    &service.provider.stage,
                    class.name(),
                    &handler.method,
                    options.trim,
                )?;
                let route = Route::new(*class, handler.method.clone());
                if let Some(existing) = functions.get(&name) {
                    return Err(ManifestError::DuplicateFunctionName {
                        name,
                        first: existing.route.to_string(),
                        second: route.to_string(),
                    });
                }

                debug!(function = %name, route = %route, events = handler.events.len(), "Resolved function");
                functions.insert(
                    name.clone(),
                    FunctionDefinition {
                        handler: format!("{HANDLER_ENTRY_PREFIX}{name}"),
                        events: handler.events.clone(),
                        route,
                    },
                );
            }
        }

        info!(
            service = %service.name,
            stage = %service.provider.stage,
            functions = functions.len(),
            "Generated deployment manifest"
        );
        Ok(Self { service, functions })
    }

    /// Generate the manifest of the only registered service
    pub fn from_registry(registry: &MetadataRegistry, options: &GeneratorOptions) -> Result<Self> {
        let services: Vec<ClassId> = registry.services().map(|(class, _)| class).collect();
        match services.as_slice() {
            [] => Err(ManifestError::NoService),
            [class] => Self::generate(registry, *class, options),
            _ => Err(ManifestError::MultipleServices(services)),
        }
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    /// In-process routing for the generated functions
    pub fn routes(&self) -> RouteTable {
        let mut routes = RouteTable::new();
        for (name, function) in &self.functions {
            routes.insert(name.clone(), function.route.clone());
        }
        routes
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Render as a YAML deployment descriptor
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }
}
