//! End-to-end dispatch: registration, binding, middleware and error recovery
//! through the public crates only.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lambda_dispatch::prelude::*;
use lambda_dispatch_metadata::prelude::*;
use serde_json::json;

struct TestService;
struct TestHandler;

type Sequence = Arc<Mutex<Vec<&'static str>>>;

struct Recorder {
    name: &'static str,
    sequence: Sequence,
}

#[async_trait]
impl Middleware for Recorder {
    async fn handle(&self, _event: &mut Value, _context: &mut Value) -> HandlerResult<()> {
        self.sequence.lock().unwrap().push(self.name);
        Ok(())
    }
}

fn recorder(name: &'static str, sequence: &Sequence) -> SharedMiddleware {
    Arc::new(Recorder {
        name,
        sequence: sequence.clone(),
    })
}

/// Registry and dispatcher shared by every scenario in this file
fn setup(sequence: &Sequence, error_response: Option<Value>) -> Dispatcher {
    let mut registry = MetadataRegistry::new();
    registry
        .annotate::<TestService>()
        .service(
            ServiceDescriptor::new("test-service", ProviderConfig::aws("test", "us-east-1"))
                .handler_type::<TestHandler>(),
        )
        .unwrap();

    let mut class = registry.annotate::<TestHandler>();
    class
        .method("testMethod")
        .handler(Handler::http("/test/{testPathKey}", HttpMethod::Get))
        .param(0, Param::query("testParamKey"))
        .unwrap()
        .param(1, Param::path("testPathKey"))
        .unwrap()
        .param(2, Param::event())
        .unwrap()
        .param(3, Param::context())
        .unwrap();
    class
        .method("ordered")
        .handler(
            Handler::http("/ordered", HttpMethod::Post)
                .middleware(recorder("A", sequence))
                .middleware(recorder("B", sequence)),
        );
    class
        .method("parsed")
        .handler(Handler::http("/parsed", HttpMethod::Post))
        .param(0, Param::body("random"))
        .unwrap()
        .param(1, Param::body("count").parse_with(parsers::integer()))
        .unwrap();
    class
        .method("failing")
        .handler(Handler::http("/failing", HttpMethod::Get));
    if let Some(response) = error_response {
        class
            .error_handler(error_handler_fn(move |_| Some(response.clone())))
            .unwrap();
    }

    let invoked = sequence.clone();
    let handler = MethodTable::for_type::<TestHandler>()
        .with_method("testMethod", 4, |args| async move {
            Ok(Value::Array(
                args.into_iter().map(Option::unwrap_or_default).collect(),
            ))
        })
        .with_method("ordered", 0, move |_| {
            let invoked = invoked.clone();
            async move {
                invoked.lock().unwrap().push("method");
                Ok(json!("ordered"))
            }
        })
        .with_method("parsed", 2, |args| async move { Ok(json!([args[0], args[1]])) })
        .with_method("failing", 0, |_| async { Err(HandlerError::new("no status here")) });

    let container = NamedContainer::new()
        .with_service(Arc::new(HooklessService::for_type::<TestService>()))
        .with_handler(Arc::new(handler));
    Dispatcher::new(Arc::new(registry), Arc::new(container))
}

#[tokio::test]
async fn test_positional_arguments_follow_binding_indices() {
    let sequence = Sequence::default();
    let dispatcher = setup(&sequence, None);

    let event = json!({
        "queryStringParameters": {"testParamKey": "testParam"},
        "pathParameters": {"testPathKey": "testPath"},
    });
    let context = json!({"requestId": "ctx-1"});

    let args = dispatcher
        .handle("testMethod", "TestHandler", event.clone(), context.clone())
        .await
        .unwrap();

    assert_eq!(args, json!(["testParam", "testPath", event, context]));
}

#[tokio::test]
async fn test_missing_sources_bind_as_null() {
    let sequence = Sequence::default();
    let dispatcher = setup(&sequence, None);

    let args = dispatcher
        .handle("testMethod", "TestHandler", Value::Null, json!({}))
        .await
        .unwrap();
    assert_eq!(args, json!([null, null, null, {}]));
}

#[tokio::test]
async fn test_middleware_runs_in_registration_order() {
    let sequence = Sequence::default();
    let dispatcher = setup(&sequence, None);

    for _ in 0..3 {
        dispatcher
            .handle("ordered", "TestHandler", json!({}), json!({}))
            .await
            .unwrap();
    }

    assert_eq!(
        *sequence.lock().unwrap(),
        vec!["A", "B", "method", "A", "B", "method", "A", "B", "method"]
    );
}

#[tokio::test]
async fn test_json_body_is_parsed_for_body_bindings() {
    let sequence = Sequence::default();
    let dispatcher = setup(&sequence, None);

    let event = json!({
        "headers": {"Content-Type": "application/json"},
        "body": "{\"random\":\"value\",\"count\":\"12\"}",
    });
    let result = dispatcher
        .handle("parsed", "TestHandler", event, json!({}))
        .await
        .unwrap();
    assert_eq!(result, json!(["value", 12]));

    let unknown = json!({
        "headers": {"Content-Type": "unknown"},
        "body": "{\"random\":\"value\"}",
    });
    let result = dispatcher
        .handle("parsed", "TestHandler", unknown, json!({}))
        .await
        .unwrap();
    assert_eq!(result, json!([null, null]));
}

#[tokio::test]
async fn test_error_handler_response_reaches_callback() {
    let sequence = Sequence::default();
    let dispatcher = setup(&sequence, Some(json!({"statusCode": 503, "body": "later"})));

    let mut outcome = None;
    dispatcher
        .handle_with_callback("failing", "TestHandler", json!({}), json!({}), |err, response| {
            outcome = Some((err.is_none(), response));
        })
        .await;

    assert_eq!(
        outcome,
        Some((true, Some(json!({"statusCode": 503, "body": "later"}))))
    );
}

#[tokio::test]
async fn test_unhandled_error_reaches_callback() {
    let sequence = Sequence::default();
    let dispatcher = setup(&sequence, None);

    let mut outcome = None;
    dispatcher
        .handle_with_callback("failing", "TestHandler", json!({}), json!({}), |err, response| {
            outcome = Some((err.map(|e| e.to_string()), response));
        })
        .await;

    assert_eq!(outcome, Some((Some("no status here".to_string()), None)));
}
