//! Invocation context conversion

use lambda_runtime::Context;
use serde_json::{Map, Value, json};

/// Structured value of a Lambda invocation context
///
/// Keys follow the Lambda context object: `requestId`, `deadline`,
/// `invokedFunctionArn`, `functionName`, `functionVersion`, `memoryLimitInMB`,
/// `logGroupName`, `logStreamName`, plus `xrayTraceId` and `identity` when
/// present.
pub fn context_value(context: &Context) -> Value {
    let config = &context.env_config;
    let mut value = Map::new();
    value.insert("requestId".to_string(), json!(context.request_id));
    value.insert("deadline".to_string(), json!(context.deadline));
    value.insert(
        "invokedFunctionArn".to_string(),
        json!(context.invoked_function_arn),
    );
    value.insert("functionName".to_string(), json!(config.function_name));
    value.insert("functionVersion".to_string(), json!(config.version));
    value.insert("memoryLimitInMB".to_string(), json!(config.memory));
    value.insert("logGroupName".to_string(), json!(config.log_group));
    value.insert("logStreamName".to_string(), json!(config.log_stream));

    if let Some(trace_id) = &context.xray_trace_id {
        value.insert("xrayTraceId".to_string(), json!(trace_id));
    }
    if let Some(identity) = &context.identity {
        value.insert(
            "identity".to_string(),
            json!({
                "cognitoIdentityId": identity.identity_id,
                "cognitoIdentityPoolId": identity.identity_pool_id,
            }),
        );
    }
    Value::Object(value)
}
