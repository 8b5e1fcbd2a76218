//! User service on AWS Lambda
//!
//! Deploys three functions from one binary: an HTTP lookup, an HTTP create
//! and a scheduled cleanup. The active function comes from `_HANDLER`.
//!
//! Print the deployment manifest instead of serving:
//!
//! ```bash
//! cargo run --bin user-service -- --manifest
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lambda_dispatch::prelude::*;
use lambda_dispatch_aws_lambda::prelude::*;
use lambda_dispatch_metadata::prelude::*;
use serde_json::json;
use tracing::info;

type Store = Arc<Mutex<BTreeMap<String, Value>>>;

struct UserService;

impl Annotated for UserService {
    fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError> {
        registry.annotate::<Self>().service(
            ServiceDescriptor::new(
                "users",
                ProviderConfig::aws("dev", "us-east-1")
                    .runtime("provided.al2023")
                    .env("TABLE_NAME", "users"),
            )
            .handler_type::<UserHandler>(),
        )?;
        Ok(())
    }
}

#[async_trait]
impl Service for UserService {
    fn class_id(&self) -> ClassId {
        ClassId::of::<Self>()
    }

    async fn pre_handle(&self, _event: &mut Value, context: &mut Value) -> HandlerResult<()> {
        info!(request_id = %context["requestId"], "Handling request");
        Ok(())
    }
}

struct UserHandler;

impl Annotated for UserHandler {
    fn annotate(registry: &mut MetadataRegistry) -> Result<(), RegistryError> {
        let require_json = middleware_fn(|event, _context| {
            let content_type = lambda_dispatch_metadata::value::header_value(
                &event["headers"],
                "Content-Type",
            );
            match content_type.and_then(Value::as_str) {
                Some(value) if value.starts_with("application/json") => Ok(()),
                _ => Err(HandlerError::with_status(415, "Expected a JSON body")),
            }
        });

        let mut class = registry.annotate::<Self>();
        class
            .method("getUser")
            .handler(Handler::http("/users/{id}", HttpMethod::Get))
            .param(0, Param::path("id"))?;
        class
            .method("createUser")
            .handler(Handler::http("/users", HttpMethod::Post).middleware(require_json))
            .param(0, Param::body("name"))?
            .param(1, Param::body("email"))?;
        class.method("purge").handler(Handler::schedule(
            "rate(1 day)",
            ScheduleOptions {
                description: Some("Drop every stored user".to_string()),
                ..Default::default()
            },
        ));
        class.error_handler(error_handler_fn(|err| {
            (err.status_code() == Some(404)).then(|| {
                HttpResponse::message(404, &format!("User lookup failed: {}", err.message()))
                    .into_value()
            })
        }))?;
        Ok(())
    }
}

fn user_handler(store: Store) -> MethodTable {
    let lookup = store.clone();
    let create = store.clone();
    MethodTable::for_type::<UserHandler>()
        .with_method("getUser", 1, move |args| {
            let store = lookup.clone();
            async move {
                let id = args[0].as_ref().and_then(Value::as_str).unwrap_or_default();
                let user = store
                    .lock()
                    .map_err(|_| HandlerError::new("user store poisoned"))?
                    .get(id)
                    .cloned()
                    .ok_or_else(|| HandlerError::not_found(format!("no user {id}")))?;
                HttpResponse::ok(&user)
                    .map(HttpResponse::into_value)
                    .map_err(HandlerError::from_error)
            }
        })
        .with_method("createUser", 2, move |args| {
            let store = create.clone();
            async move {
                let name = args[0]
                    .as_ref()
                    .and_then(Value::as_str)
                    .ok_or_else(|| HandlerError::bad_request("name is required"))?;
                let mut users = store
                    .lock()
                    .map_err(|_| HandlerError::new("user store poisoned"))?;
                let id = (users.len() + 1).to_string();
                let user = json!({"id": id, "name": name, "email": args[1]});
                users.insert(id, user.clone());
                HttpResponse::json(201, &user)
                    .map(HttpResponse::into_value)
                    .map_err(HandlerError::from_error)
            }
        })
        .with_method("purge", 0, move |_| {
            let store = store.clone();
            async move {
                let mut users = store
                    .lock()
                    .map_err(|_| HandlerError::new("user store poisoned"))?;
                let purged = users.len();
                users.clear();
                Ok(json!({"purged": purged}))
            }
        })
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    init_tracing();

    let store: Store = Arc::new(Mutex::new(BTreeMap::new()));
    let server = LambdaDispatchBuilder::new()
        .register::<UserService>()?
        .register::<UserHandler>()?
        .service(Arc::new(UserService))
        .handler(Arc::new(user_handler(store)))
        .build()?;

    if std::env::args().any(|arg| arg == "--manifest") {
        println!("{}", server.manifest().to_yaml()?);
        return Ok(());
    }

    let handler = server.handler_from_env()?;
    info!(function = handler.function(), route = %handler.route(), "Starting user service");
    run(handler).await
}
