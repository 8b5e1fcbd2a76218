//! Function routing through the Lambda handler

use std::sync::Arc;

use lambda_dispatch::prelude::*;
use lambda_dispatch_aws_lambda::prelude::*;
use lambda_dispatch_manifest::ManifestError;
use lambda_dispatch_metadata::prelude::*;
use lambda_runtime::{Context, LambdaEvent};
use serde_json::json;

struct Inventory;
struct StockHandler;

impl Annotated for Inventory {
    fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError> {
        registry.annotate::<Self>().service(
            ServiceDescriptor::new("inventory", ProviderConfig::aws("dev", "eu-west-1"))
                .handler_type::<StockHandler>(),
        )?;
        Ok(())
    }
}

impl Annotated for StockHandler {
    fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError> {
        let mut class = registry.annotate::<Self>();
        class
            .method("level")
            .handler(Handler::http("/stock/{sku}", HttpMethod::Get))
            .param(0, Param::path("sku"))?
            .param(1, Param::context_value("requestId"))?;
        class
            .method("restock")
            .handler(Handler::schedule("rate(1 hour)", ScheduleOptions::default()));
        Ok(())
    }
}

fn builder() -> LambdaDispatchBuilder {
    let handler = MethodTable::for_type::<StockHandler>()
        .with_method("level", 2, |args| async move {
            Ok(json!({"sku": args[0], "request": args[1]}))
        })
        .with_method("restock", 0, |_| async { Ok(json!("restocked")) });

    LambdaDispatchBuilder::new()
        .register::<Inventory>()
        .unwrap()
        .register::<StockHandler>()
        .unwrap()
        .service(Arc::new(HooklessService::for_type::<Inventory>()))
        .handler(Arc::new(handler))
}

fn invocation(payload: Value) -> LambdaEvent<Value> {
    let mut context = Context::default();
    context.request_id = "req-42".to_string();
    LambdaEvent::new(payload, context)
}

#[test]
fn test_build_generates_routes() {
    let server = builder().build().unwrap();

    let functions: Vec<&str> = server.routes().functions().collect();
    assert_eq!(functions, vec!["StockHandler_level", "StockHandler_restock"]);
    assert_eq!(server.manifest().service.name, "inventory");
    assert_eq!(
        server.manifest().function("StockHandler_level").unwrap().handler,
        "handler.StockHandler_level"
    );
}

#[tokio::test]
async fn test_handler_entry_dispatches_with_context() {
    let server = builder().build().unwrap();
    let handler = server.handler("handler.StockHandler_level").unwrap();
    assert_eq!(handler.function(), "StockHandler_level");
    assert_eq!(handler.route().method, "level");

    let response = handler
        .handle(invocation(json!({"pathParameters": {"sku": "A-1"}})))
        .await
        .unwrap();
    assert_eq!(response, json!({"sku": "A-1", "request": "req-42"}));
}

#[tokio::test]
async fn test_function_name_resolves_route() {
    let server = builder().stage("prod").build().unwrap();
    let config = LambdaConfig::new().with_function_name("inventory-prod-StockHandler_restock");

    let handler = server.handler_from_config(&config).unwrap();
    let response = handler.invoke(json!({}), json!({})).await.unwrap();
    assert_eq!(response, json!("restocked"));
}

#[test]
fn test_unknown_function_is_rejected() {
    let server = builder().build().unwrap();
    assert!(matches!(
        server.handler("StockHandler_missing"),
        Err(LambdaError::RouteNotFound(name)) if name == "StockHandler_missing"
    ));
    assert!(matches!(
        server.handler_from_config(&LambdaConfig::new()),
        Err(LambdaError::Config(_))
    ));
}

#[test]
fn test_missing_handler_instance_fails_build() {
    let result = LambdaDispatchBuilder::new()
        .register::<Inventory>()
        .unwrap()
        .register::<StockHandler>()
        .unwrap()
        .service(Arc::new(HooklessService::for_type::<Inventory>()))
        .build();

    assert!(matches!(
        result,
        Err(LambdaError::Dispatch(DispatchError::UnboundHandler { .. }))
    ));
}

#[test]
fn test_empty_registry_has_no_service() {
    assert!(matches!(
        LambdaDispatchBuilder::new().build(),
        Err(LambdaError::Manifest(ManifestError::NoService))
    ));
}
