//! High-level builder API for Lambda dispatch servers
//!
//! Collects the metadata registry, service and handler instances and the
//! manifest options, then produces a [`LambdaDispatchServer`] whose generated
//! functions are routed back to handler methods.

use std::sync::Arc;

use lambda_dispatch::{Container, Dispatcher, NamedContainer, SharedEventHandler, SharedService};
use lambda_dispatch_manifest::{DeploymentManifest, GeneratorOptions};
use lambda_dispatch_metadata::{Annotated, ClassId, MetadataRegistry};
use tracing::{debug, info};

use crate::error::Result;
use crate::server::LambdaDispatchServer;

/// Builder for Lambda dispatch servers
///
/// ## Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use lambda_dispatch::prelude::*;
/// use lambda_dispatch_aws_lambda::LambdaDispatchBuilder;
/// use lambda_dispatch_metadata::prelude::*;
/// use serde_json::json;
///
/// struct Greeter;
/// struct GreetHandler;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let mut registry = MetadataRegistry::new();
///     registry.annotate::<Greeter>().service(
///         ServiceDescriptor::new("greeter", ProviderConfig::aws("dev", "us-east-1"))
///             .handler_type::<GreetHandler>(),
///     )?;
///     registry
///         .annotate::<GreetHandler>()
///         .method("hello")
///         .handler(Handler::http("/hello", HttpMethod::Get))
///         .param(0, Param::query("name"))?;
///
///     let server = LambdaDispatchBuilder::new()
///         .registry(registry)
///         .service(Arc::new(HooklessService::for_type::<Greeter>()))
///         .handler(Arc::new(MethodTable::for_type::<GreetHandler>().with_method(
///             "hello",
///             1,
///             |args| async move { Ok(json!({"hello": args[0]})) },
///         )))
///         .build()?;
///
///     lambda_dispatch_aws_lambda::run(server.handler_from_env()?).await?;
///     Ok(())
/// }
/// ```
pub struct LambdaDispatchBuilder {
    registry: MetadataRegistry,
    container: NamedContainer,
    custom_container: Option<Arc<dyn Container>>,
    service_class: Option<ClassId>,
    options: GeneratorOptions,
}

impl LambdaDispatchBuilder {
    pub fn new() -> Self {
        Self {
            registry: MetadataRegistry::new(),
            container: NamedContainer::new(),
            custom_container: None,
            service_class: None,
            options: GeneratorOptions::new(),
        }
    }

    /// Use an already populated registry
    pub fn registry(mut self, registry: MetadataRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register the metadata of an annotated type
    pub fn register<T: Annotated>(mut self) -> Result<Self> {
        self.registry.register::<T>()?;
        Ok(self)
    }

    pub fn service(mut self, service: SharedService) -> Self {
        self.container.bind_service(service);
        self
    }

    pub fn handler(mut self, handler: SharedEventHandler) -> Self {
        self.container.bind_handler(handler);
        self
    }

    /// Resolve instances from a custom container instead of the bound ones
    pub fn container(mut self, container: Arc<dyn Container>) -> Self {
        self.custom_container = Some(container);
        self
    }

    /// Service to deploy when the registry holds more than one
    pub fn service_class(mut self, class: ClassId) -> Self {
        self.service_class = Some(class);
        self
    }

    /// Override the provider stage
    pub fn stage(mut self, stage: impl Into<String>) -> Self {
        self.options = self.options.with_stage(stage);
        self
    }

    /// Trim function names that exceed the provider limit
    pub fn trim(mut self, trim: bool) -> Self {
        self.options = self.options.with_trim(trim);
        self
    }

    pub fn options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<LambdaDispatchServer> {
        let manifest = match self.service_class {
            Some(class) => DeploymentManifest::generate(&self.registry, class, &self.options)?,
            None => DeploymentManifest::from_registry(&self.registry, &self.options)?,
        };

        let container: Arc<dyn Container> = match self.custom_container {
            Some(container) => container,
            None => {
                self.container.verify(&self.registry)?;
                Arc::new(self.container)
            }
        };

        let routes = manifest.routes();
        for (function, route) in routes.iter() {
            debug!(function, route = %route, "Registered route");
        }
        info!(
            service = %manifest.service.name,
            stage = %manifest.service.provider.stage,
            functions = routes.len(),
            "Lambda dispatch server built"
        );

        let dispatcher = Dispatcher::new(Arc::new(self.registry), container);
        Ok(LambdaDispatchServer::new(dispatcher, manifest, routes))
    }
}

impl Default for LambdaDispatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
