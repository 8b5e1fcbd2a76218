//! Per-function Lambda handler

use lambda_dispatch::Dispatcher;
use lambda_dispatch_manifest::Route;
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::context::context_value;
use crate::error::Result;

/// Dispatches every invocation of one function to its routed method
#[derive(Debug, Clone)]
pub struct LambdaDispatchHandler {
    dispatcher: Dispatcher,
    function: String,
    route: Route,
}

impl LambdaDispatchHandler {
    pub(crate) fn new(dispatcher: Dispatcher, function: String, route: Route) -> Self {
        Self {
            dispatcher,
            function,
            route,
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Handle a runtime invocation
    #[instrument(skip_all, fields(function = %self.function, request_id = %event.context.request_id))]
    pub async fn handle(&self, event: LambdaEvent<Value>) -> Result<Value> {
        let (payload, context) = event.into_parts();
        self.invoke(payload, context_value(&context)).await
    }

    /// Handle an event with an already structured context
    pub async fn invoke(&self, event: Value, context: Value) -> Result<Value> {
        debug!(route = %self.route, "Invoking route");
        let response = self
            .dispatcher
            .handle(&self.route.method, self.route.handler.name(), event, context)
            .await?;
        Ok(response)
    }
}
