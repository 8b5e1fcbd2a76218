//! Lambda dispatch server
//!
//! Holds what the builder produced and hands out a handler for the function
//! the current process was deployed as.

use std::sync::Arc;

use lambda_dispatch::Dispatcher;
use lambda_dispatch_manifest::{DeploymentManifest, RouteTable};
use tracing::info;

use crate::config::LambdaConfig;
use crate::error::{LambdaError, Result};
use crate::handler::LambdaDispatchHandler;

#[derive(Debug, Clone)]
pub struct LambdaDispatchServer {
    dispatcher: Dispatcher,
    manifest: Arc<DeploymentManifest>,
    routes: Arc<RouteTable>,
}

impl LambdaDispatchServer {
    pub(crate) fn new(dispatcher: Dispatcher, manifest: DeploymentManifest, routes: RouteTable) -> Self {
        Self {
            dispatcher,
            manifest: Arc::new(manifest),
            routes: Arc::new(routes),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn manifest(&self) -> &DeploymentManifest {
        &self.manifest
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Handler for a generated function name or its `handler.` entry
    pub fn handler(&self, function: &str) -> Result<LambdaDispatchHandler> {
        let route = self
            .routes
            .resolve(function)
            .ok_or_else(|| LambdaError::RouteNotFound(function.to_string()))?;
        let name = function
            .strip_prefix(lambda_dispatch_manifest::HANDLER_ENTRY_PREFIX)
            .unwrap_or(function);

        info!(function = name, route = %route, "Serving function");
        Ok(LambdaDispatchHandler::new(
            self.dispatcher.clone(),
            name.to_string(),
            route.clone(),
        ))
    }

    /// Handler for the function described by the Lambda environment
    pub fn handler_from_env(&self) -> Result<LambdaDispatchHandler> {
        self.handler_from_config(&LambdaConfig::from_env())
    }

    pub fn handler_from_config(&self, config: &LambdaConfig) -> Result<LambdaDispatchHandler> {
        let service = &self.manifest.service;
        let function = config
            .route_key(&service.name, &service.provider.stage)
            .ok_or_else(|| {
                LambdaError::Config(format!(
                    "neither {} nor {} is set",
                    crate::config::HANDLER_ENV,
                    crate::config::FUNCTION_NAME_ENV
                ))
            })?;
        self.handler(&function)
    }
}
