//! Function name to handler method routing

use std::collections::BTreeMap;
use std::fmt;

use lambda_dispatch_metadata::ClassId;

/// Prefix of the per-function handler entry, `handler.<function>`
pub const HANDLER_ENTRY_PREFIX: &str = "handler.";

/// The handler class and method a deployed function invokes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub handler: ClassId,
    pub method: String,
}

impl Route {
    pub fn new(handler: ClassId, method: impl Into<String>) -> Self {
        Self {
            handler,
            method: method.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.handler, self.method)
    }
}

/// Routes keyed by resolved function name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<String, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route, returning the one it replaced
    pub fn insert(&mut self, function: impl Into<String>, route: Route) -> Option<Route> {
        self.routes.insert(function.into(), route)
    }

    pub fn get(&self, function: &str) -> Option<&Route> {
        self.routes.get(function)
    }

    /// Look up by function name or by `handler.<function>` entry
    pub fn resolve(&self, entry: &str) -> Option<&Route> {
        let function = entry.strip_prefix(HANDLER_ENTRY_PREFIX).unwrap_or(entry);
        self.get(function)
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
