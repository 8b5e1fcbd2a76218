//! # lambda-dispatch
//!
//! Routes a generic serverless invocation (event, context) to one of many
//! annotated handler methods. The [`Dispatcher`] looks the handler up in a
//! [`Container`], runs the owning [`Service`]'s hooks and the method's
//! middleware, binds the declared parameters from the event and context and
//! turns the outcome into a single response.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lambda_dispatch::prelude::*;
//! use lambda_dispatch_metadata::prelude::*;
//! use serde_json::json;
//!
//! struct Users;
//! struct UserHandler;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = MetadataRegistry::new();
//! registry.annotate::<Users>().service(
//!     ServiceDescriptor::new("users", ProviderConfig::aws("dev", "us-east-1"))
//!         .handler_type::<UserHandler>(),
//! )?;
//! registry
//!     .annotate::<UserHandler>()
//!     .method("get")
//!     .handler(Handler::http("/users/{id}", HttpMethod::Get))
//!     .param(0, Param::path("id"))?;
//!
//! let container = NamedContainer::new()
//!     .with_service(Arc::new(HooklessService::for_type::<Users>()))
//!     .with_handler(Arc::new(MethodTable::for_type::<UserHandler>().with_method(
//!         "get",
//!         1,
//!         |args| async move { Ok(json!({ "id": args[0] })) },
//!     )));
//!
//! let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(container));
//! let response = dispatcher
//!     .handle("get", "UserHandler", json!({"pathParameters": {"id": "42"}}), json!({}))
//!     .await?;
//! assert_eq!(response, json!({"id": "42"}));
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod container;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod response;
pub mod service;

pub mod prelude;

pub use binder::{bind_params, normalize_body};
pub use container::{Container, NamedContainer};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Result};
pub use handler::{Args, EventHandler, MethodFn, MethodSignature, MethodTable, SharedEventHandler};
pub use response::HttpResponse;
pub use service::{HooklessService, Service, SharedService};
