//! Route selection from the Lambda environment

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use lambda_dispatch::prelude::*;
use lambda_dispatch_aws_lambda::config::{FUNCTION_NAME_ENV, HANDLER_ENV};
use lambda_dispatch_aws_lambda::prelude::*;
use lambda_dispatch_metadata::prelude::*;
use lambda_runtime::{Context, LambdaEvent};
use serde_json::json;
use serial_test::serial;

struct Greeter;
struct GreetHandler;

#[async_trait]
impl Service for Greeter {
    fn class_id(&self) -> ClassId {
        ClassId::of::<Self>()
    }

    async fn post_handle(&self, _event: &Value, context: &Value, result: Value) -> HandlerResult<Value> {
        Ok(json!({"result": result, "requestId": context["requestId"]}))
    }
}

fn server() -> LambdaDispatchServer {
    let mut registry = MetadataRegistry::new();
    registry
        .annotate::<Greeter>()
        .service(
            ServiceDescriptor::new("greeter", ProviderConfig::aws("dev", "us-east-1"))
                .handler_type::<GreetHandler>(),
        )
        .unwrap();
    let mut class = registry.annotate::<GreetHandler>();
    class
        .method("hello")
        .handler(Handler::http("/hello", HttpMethod::Get))
        .param(0, Param::query("name"))
        .unwrap();
    class
        .method("goodbye")
        .handler(Handler::http("/goodbye", HttpMethod::Get))
        .param(0, Param::header("X-Name"))
        .unwrap();

    LambdaDispatchBuilder::new()
        .registry(registry)
        .service(Arc::new(Greeter))
        .handler(Arc::new(
            MethodTable::for_type::<GreetHandler>()
                .with_method("hello", 1, |args| async move {
                    let name = args[0].as_ref().and_then(Value::as_str).unwrap_or("stranger");
                    Ok(json!(format!("hello {name}")))
                })
                .with_method("goodbye", 1, |args| async move { Ok(json!({"bye": args[0]})) }),
        ))
        .build()
        .unwrap()
}

/// Sets a variable for the lifetime of the guard
struct TempEnv {
    key: &'static str,
    prev: Option<String>,
}

impl TempEnv {
    fn set(key: &'static str, value: Option<&str>) -> Self {
        let prev = env::var(key).ok();
        unsafe {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        Self { key, prev }
    }
}

impl Drop for TempEnv {
    fn drop(&mut self) {
        unsafe {
            match &self.prev {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }
}

fn invocation(payload: Value) -> LambdaEvent<Value> {
    let mut context = Context::default();
    context.request_id = "req-7".to_string();
    LambdaEvent::new(payload, context)
}

#[tokio::test]
#[serial]
async fn test_handler_entry_selects_route() {
    let _handler = TempEnv::set(HANDLER_ENV, Some("handler.GreetHandler_hello"));
    let _function = TempEnv::set(FUNCTION_NAME_ENV, Some("greeter-dev-GreetHandler_goodbye"));

    let handler = server().handler_from_env().unwrap();
    assert_eq!(handler.function(), "GreetHandler_hello");

    let response = handler
        .handle(invocation(json!({"queryStringParameters": {"name": "ada"}})))
        .await
        .unwrap();
    assert_eq!(response, json!({"result": "hello ada", "requestId": "req-7"}));
}

#[tokio::test]
#[serial]
async fn test_function_name_selects_route_without_handler_entry() {
    let _handler = TempEnv::set(HANDLER_ENV, None);
    let _function = TempEnv::set(FUNCTION_NAME_ENV, Some("greeter-dev-GreetHandler_goodbye"));

    let handler = server().handler_from_env().unwrap();
    assert_eq!(handler.route().method, "goodbye");

    let response = handler
        .handle(invocation(json!({"headers": {"x-name": "grace"}})))
        .await
        .unwrap();
    assert_eq!(response, json!({"result": {"bye": "grace"}, "requestId": "req-7"}));
}

#[test]
#[serial]
fn test_unknown_function_in_environment() {
    let _handler = TempEnv::set(HANDLER_ENV, Some("handler.GreetHandler_wave"));

    assert!(matches!(
        server().handler_from_env(),
        Err(LambdaError::RouteNotFound(name)) if name == "GreetHandler_wave"
    ));
}
