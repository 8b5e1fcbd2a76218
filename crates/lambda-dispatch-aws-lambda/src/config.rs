//! Runtime configuration from the Lambda environment

use lambda_dispatch_manifest::{HANDLER_ENTRY_PREFIX, function_prefix};

/// Handler entry configured for the function, `handler.<function>`
pub const HANDLER_ENV: &str = "_HANDLER";

/// Deployed function name, `<service>-<stage>-<function>`
pub const FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Which function this process serves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LambdaConfig {
    pub handler: Option<String>,
    pub function_name: Option<String>,
}

impl LambdaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `_HANDLER` and `AWS_LAMBDA_FUNCTION_NAME`; empty values count as unset
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            handler: read(HANDLER_ENV),
            function_name: read(FUNCTION_NAME_ENV),
        }
    }

    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    pub fn with_function_name(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = Some(function_name.into());
        self
    }

    /// Generated function name to route to
    ///
    /// The handler entry wins; otherwise the deployed function name with the
    /// `<service>-<stage>-` prefix removed.
    pub fn route_key(&self, service: &str, stage: &str) -> Option<String> {
        if let Some(handler) = &self.handler {
            let key = handler.strip_prefix(HANDLER_ENTRY_PREFIX).unwrap_or(handler);
            return Some(key.to_string());
        }
        self.function_name.as_deref().map(|name| {
            let prefix = function_prefix(service, stage);
            name.strip_prefix(prefix.as_str()).unwrap_or(name).to_string()
        })
    }
}
