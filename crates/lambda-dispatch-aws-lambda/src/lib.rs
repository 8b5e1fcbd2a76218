//! # AWS Lambda Integration for lambda-dispatch
//!
//! Runs a dispatch service on the AWS Lambda runtime. One binary serves every
//! generated function: the `_HANDLER` entry (or the deployed function name)
//! selects the route, and each invocation goes through the dispatcher's
//! pipeline with the Lambda context converted to a structured value.
//!
//! ## Features
//!
//! - **Builder**: registry, instances and manifest options in one place
//! - **Routing**: generated function names resolved back to handler methods
//! - **Context conversion**: request id, deadline and function details for `Context` bindings
//! - **Runtime loop**: [`run`] wires a handler into `lambda_runtime`

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod server;

pub mod prelude;

pub use builder::LambdaDispatchBuilder;
pub use config::LambdaConfig;
pub use context::context_value;
pub use error::{LambdaError, Result};
pub use handler::LambdaDispatchHandler;
pub use server::LambdaDispatchServer;

use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;

/// Run a handler on the Lambda runtime until the process is stopped
pub async fn run(handler: LambdaDispatchHandler) -> std::result::Result<(), lambda_runtime::Error> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move {
            handler
                .handle(event)
                .await
                .map_err(|err| Box::new(err) as lambda_runtime::Error)
        }
    }))
    .await
}

/// Install the default tracing subscriber
///
/// Filtering follows `RUST_LOG`. Lambda adds its own timestamps, so none are printed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .try_init();
}
