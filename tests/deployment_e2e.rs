//! Manifest generation and routing of a registered service

use std::sync::Arc;

use lambda_dispatch::prelude::*;
use lambda_dispatch_aws_lambda::prelude::*;
use lambda_dispatch_manifest::prelude::*;
use lambda_dispatch_metadata::prelude::*;
use serde_json::{Map, json};

struct Billing;
struct InvoiceHandler;
struct ReportHandler;

impl Annotated for Billing {
    fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError> {
        registry.annotate::<Self>().service(
            ServiceDescriptor::new(
                "billing",
                ProviderConfig::aws("test", "ap-southeast-2").iam_statement(IamStatement::allow(
                    vec!["s3:GetObject".to_string()],
                    "arn:aws:s3:::invoices/*",
                )),
            )
            .handler_type::<InvoiceHandler>()
            .handler_type::<ReportHandler>(),
        )?;
        Ok(())
    }
}

impl Annotated for InvoiceHandler {
    fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError> {
        let mut class = registry.annotate::<Self>();
        class
            .method("create")
            .handler(Handler::http("/invoices", HttpMethod::Post))
            .param(0, Param::body("amount").parse_with(parsers::number()))?;
        class
            .method("archive")
            .handler(Handler::s3("invoices", "s3:ObjectCreated:*"));
        Ok(())
    }
}

impl Annotated for ReportHandler {
    fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError> {
        let mut queue = Map::new();
        queue.insert("sqs".to_string(), json!({"arn": "arn:aws:sqs:ap-southeast-2:1:reports"}));

        registry
            .annotate::<Self>()
            .method("monthly")
            .handler(Handler::schedule("cron(0 0 1 * ? *)", ScheduleOptions::default()))
            .handler(Handler::custom(queue));
        Ok(())
    }
}

fn registry() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    registry
        .register::<Billing>()
        .and_then(|r| r.register::<InvoiceHandler>())
        .and_then(|r| r.register::<ReportHandler>())
        .unwrap();
    registry
}

#[test]
fn test_manifest_lists_every_method() {
    let manifest = DeploymentManifest::from_registry(&registry(), &GeneratorOptions::new()).unwrap();

    let names: Vec<&String> = manifest.functions.keys().collect();
    assert_eq!(
        names,
        vec!["InvoiceHandler_archive", "InvoiceHandler_create", "ReportHandler_monthly"]
    );

    let monthly = manifest.function("ReportHandler_monthly").unwrap();
    assert_eq!(monthly.handler, "handler.ReportHandler_monthly");
    assert_eq!(monthly.events.len(), 2);

    let value = manifest.to_value().unwrap();
    assert_eq!(value["service"], json!("billing"));
    assert_eq!(value["provider"]["stage"], json!("test"));
    assert_eq!(
        value["functions"]["InvoiceHandler_create"]["handler"],
        json!("handler.InvoiceHandler_create")
    );
}

#[test]
fn test_manifest_renders_yaml() {
    let manifest = DeploymentManifest::from_registry(&registry(), &GeneratorOptions::new()).unwrap();
    let yaml = manifest.to_yaml().unwrap();

    let parsed: serde_yml::Value = serde_yml::from_str(&yaml).unwrap();
    assert_eq!(parsed["service"].as_str(), Some("billing"));
    assert!(parsed["functions"]["InvoiceHandler_archive"].is_mapping());
}

#[test]
fn test_long_service_names_need_trimming() {
    let long_name = "s".repeat(54);
    let mut registry = MetadataRegistry::new();
    registry
        .annotate::<Billing>()
        .service(
            ServiceDescriptor::new(long_name, ProviderConfig::aws("test", "us-east-1"))
                .handler_type::<InvoiceHandler>(),
        )
        .unwrap();
    registry.register::<InvoiceHandler>().unwrap();

    let untrimmed = DeploymentManifest::from_registry(&registry, &GeneratorOptions::new());
    assert!(matches!(untrimmed, Err(ManifestError::Naming(_))));

    // both methods trim to "I_cr" / "I_ar", which stay distinct
    let trimmed =
        DeploymentManifest::from_registry(&registry, &GeneratorOptions::new().with_trim(true)).unwrap();
    let names: Vec<&String> = trimmed.functions.keys().collect();
    assert_eq!(names, vec!["I_ar", "I_cr"]);
}

#[tokio::test]
async fn test_every_route_dispatches_through_lambda_handler() {
    let invoices = MethodTable::for_type::<InvoiceHandler>()
        .with_method("create", 1, |args| async move {
            HttpResponse::json(201, &json!({"amount": args[0]}))
                .map(HttpResponse::into_value)
                .map_err(HandlerError::from_error)
        })
        .with_method("archive", 0, |_| async { Ok(json!("archived")) });
    let reports = MethodTable::for_type::<ReportHandler>()
        .with_method("monthly", 0, |_| async { Ok(json!("report")) });

    let server = LambdaDispatchBuilder::new()
        .registry(registry())
        .service(Arc::new(HooklessService::for_type::<Billing>()))
        .handler(Arc::new(invoices))
        .handler(Arc::new(reports))
        .build()
        .unwrap();

    let create = server.handler("InvoiceHandler_create").unwrap();
    let response = create
        .invoke(
            json!({
                "headers": {"content-type": "application/json"},
                "body": "{\"amount\":\"19.5\"}",
            }),
            json!({}),
        )
        .await
        .unwrap();
    assert_eq!(response["statusCode"], json!(201));
    assert_eq!(response["body"], json!("{\"amount\":19.5}"));

    let archive = server.handler("handler.InvoiceHandler_archive").unwrap();
    assert_eq!(archive.invoke(json!({}), json!({})).await.unwrap(), json!("archived"));

    let monthly = server.handler("ReportHandler_monthly").unwrap();
    assert_eq!(monthly.invoke(json!({}), json!({})).await.unwrap(), json!("report"));
}

#[tokio::test]
async fn test_parse_failure_becomes_bad_request() {
    let invoices = MethodTable::for_type::<InvoiceHandler>()
        .with_method("create", 1, |_| async { Ok(json!("unreachable")) })
        .with_method("archive", 0, |_| async { Ok(json!("archived")) });
    let reports = MethodTable::for_type::<ReportHandler>()
        .with_method("monthly", 0, |_| async { Ok(json!("report")) });

    let server = LambdaDispatchBuilder::new()
        .registry(registry())
        .service(Arc::new(HooklessService::for_type::<Billing>()))
        .handler(Arc::new(invoices))
        .handler(Arc::new(reports))
        .build()
        .unwrap();

    let response = server
        .handler("InvoiceHandler_create")
        .unwrap()
        .invoke(
            json!({
                "headers": {"Content-Type": "application/json"},
                "body": "{\"amount\":\"lots\"}",
            }),
            json!({}),
        )
        .await
        .unwrap();
    assert_eq!(response["statusCode"], json!(400));
    assert_eq!(response["body"], json!("{\"message\":\"'lots' is not a number\"}"));
}
