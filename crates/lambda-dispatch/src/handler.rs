//! Event handler interface
//!
//! An event handler is the runtime counterpart of an annotated handler
//! class: it exposes its methods by name and invokes them with positionally
//! bound arguments.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use lambda_dispatch_metadata::{ClassId, HandlerError, HandlerResult, Value};

/// Positional arguments; `None` marks an unbound or unresolved slot
pub type Args = Vec<Option<Value>>;

/// Shape of a handler method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MethodSignature {
    /// Declared parameter count, `None` when unknown
    pub arity: Option<usize>,
}

impl MethodSignature {
    pub fn new(arity: usize) -> Self {
        Self { arity: Some(arity) }
    }

    pub fn variadic() -> Self {
        Self { arity: None }
    }
}

/// Runtime handler class
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Identity matching the class's registered metadata
    fn class_id(&self) -> ClassId;

    /// Signature of a method, `None` when the handler has no such method
    fn method(&self, name: &str) -> Option<MethodSignature>;

    /// Invoke a method with bound arguments
    async fn invoke(&self, method: &str, args: Args) -> HandlerResult<Value>;

    /// Method names, for introspection
    fn methods(&self) -> Vec<String> {
        vec![]
    }
}

pub type SharedEventHandler = Arc<dyn EventHandler>;

/// Boxed method implementation stored in a [`MethodTable`]
pub type MethodFn = Arc<dyn Fn(Args) -> BoxFuture<'static, HandlerResult<Value>> + Send + Sync>;

#[derive(Clone)]
struct MethodEntry {
    signature: MethodSignature,
    call: MethodFn,
}

/// Closure-backed [`EventHandler`]
///
/// ```rust
/// use lambda_dispatch::{EventHandler, MethodTable};
/// use lambda_dispatch_metadata::{HandlerResult, Value};
///
/// struct GreetingHandler;
///
/// let handler = MethodTable::for_type::<GreetingHandler>().with_method("greet", 1, |args| async move {
///     let name = args[0].clone().unwrap_or(Value::from("world"));
///     HandlerResult::Ok(Value::from(format!("hello {}", name.as_str().unwrap_or_default())))
/// });
/// assert_eq!(handler.method("greet").unwrap().arity, Some(1));
/// ```
#[derive(Clone)]
pub struct MethodTable {
    class: ClassId,
    methods: HashMap<String, MethodEntry>,
}

impl MethodTable {
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            methods: HashMap::new(),
        }
    }

    /// Table identified by a Rust type, matching `registry.annotate::<T>()`
    pub fn for_type<T: ?Sized + 'static>() -> Self {
        Self::new(ClassId::of::<T>())
    }

    /// Add a method with a fixed arity
    pub fn with_method<F, Fut>(self, name: impl Into<String>, arity: usize, f: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Value>> + Send + 'static,
    {
        self.with_signature(name, MethodSignature::new(arity), f)
    }

    /// Add a method whose arity is unknown; its argument list is sized by its bindings
    pub fn with_variadic_method<F, Fut>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Value>> + Send + 'static,
    {
        self.with_signature(name, MethodSignature::variadic(), f)
    }

    fn with_signature<F, Fut>(mut self, name: impl Into<String>, signature: MethodSignature, f: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Value>> + Send + 'static,
    {
        let call: MethodFn = Arc::new(move |args: Args| f(args).boxed());
        self.methods.insert(name.into(), MethodEntry { signature, call });
        self
    }
}

#[async_trait]
impl EventHandler for MethodTable {
    fn class_id(&self) -> ClassId {
        self.class
    }

    fn method(&self, name: &str) -> Option<MethodSignature> {
        self.methods.get(name).map(|entry| entry.signature)
    }

    async fn invoke(&self, method: &str, args: Args) -> HandlerResult<Value> {
        match self.methods.get(method) {
            Some(entry) => (entry.call)(args).await,
            None => Err(HandlerError::not_found(format!(
                "Method '{}' not found on '{}'",
                method, self.class
            ))),
        }
    }

    fn methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("class", &self.class)
            .field("methods", &self.methods())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoHandler;

    fn table() -> MethodTable {
        MethodTable::for_type::<EchoHandler>()
            .with_method("echo", 2, |args| async move { Ok(json!(args)) })
            .with_variadic_method("fail", |_| async { Err(HandlerError::bad_request("nope")) })
    }

    #[tokio::test]
    async fn test_invoke_passes_positional_args() {
        let handler = table();
        let result = handler
            .invoke("echo", vec![Some(json!("a")), None])
            .await
            .unwrap();
        assert_eq!(result, json!(["a", null]));
    }

    #[tokio::test]
    async fn test_signatures_and_missing_methods() {
        let handler = table();
        assert_eq!(handler.class_id(), ClassId::new("EchoHandler"));
        assert_eq!(handler.method("echo"), Some(MethodSignature::new(2)));
        assert_eq!(handler.method("fail"), Some(MethodSignature::variadic()));
        assert_eq!(handler.method("other"), None);
        assert_eq!(handler.methods(), vec!["echo", "fail"]);

        let err = handler.invoke("other", vec![]).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        let err = handler.invoke("fail", vec![]).await.unwrap_err();
        assert_eq!(err.message(), "nope");
    }
}
