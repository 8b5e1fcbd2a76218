//! # Deployment Manifest for lambda-dispatch
//!
//! Turns the handler metadata of a registered service into deployable
//! functions: each handler method gets a provider-length-safe function name
//! ([`resolve_function_name`]), a `handler.<name>` entry point and its
//! declared events. The same data yields the [`RouteTable`] used at runtime
//! to map an invoked function back to its handler method.
//!
//! ```rust
//! use lambda_dispatch_manifest::prelude::*;
//! use lambda_dispatch_metadata::prelude::*;
//!
//! struct Orders;
//! struct OrderHandler;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = MetadataRegistry::new();
//! registry.annotate::<Orders>().service(
//!     ServiceDescriptor::new("orders", ProviderConfig::aws("dev", "us-east-1"))
//!         .handler_type::<OrderHandler>(),
//! )?;
//! registry
//!     .annotate::<OrderHandler>()
//!     .method("list")
//!     .handler(Handler::http("/orders", HttpMethod::Get));
//!
//! let manifest = DeploymentManifest::from_registry(&registry, &GeneratorOptions::new())?;
//! assert_eq!(manifest.function("OrderHandler_list").unwrap().handler, "handler.OrderHandler_list");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod manifest;
pub mod naming;
pub mod routes;

pub mod prelude;

pub use error::{ManifestError, NamingError, Result};
pub use manifest::{DeploymentManifest, FunctionDefinition, GeneratorOptions};
pub use naming::{MAX_FUNCTION_NAME_LENGTH, function_prefix, resolve_function_name};
pub use routes::{HANDLER_ENTRY_PREFIX, Route, RouteTable};
