//! Parameter binding
//!
//! Resolves the declared parameter bindings of a handler method against one
//! invocation's event and context, producing the positional argument list.

use lambda_dispatch_metadata::value::{header_value, lookup_path};
use lambda_dispatch_metadata::{
    ClassId, HandlerResult, MetadataRegistry, ParamBindingDescriptor, ParamSource, Value,
};
use serde_json::Map;
use tracing::debug;

use crate::handler::Args;

pub const CONTENT_TYPE: &str = "Content-Type";

/// Event key holding the raw body once the body has been parsed
pub const RAW_BODY_KEY: &str = "_body";

const FORM_CONTENT_TYPES: [&str; 2] = ["application/x-www-form-urlencoded", "multipart/formdata"];
const JSON_CONTENT_TYPE: &str = "application/json";

/// Build the argument list of `class.method` for one invocation
///
/// The list is `max(arity, highest bound index + 1)` long; every slot without
/// a binding, or whose binding found nothing, is `None`. A method without
/// bindings gets `arity` empty slots. When any slot binds the request body,
/// the event's body is normalised in place first, so the handler, later
/// slots and the service post hook all see the parsed body.
pub fn bind_params(
    registry: &MetadataRegistry,
    class: ClassId,
    method: &str,
    arity: Option<usize>,
    event: &mut Value,
    context: &Value,
) -> HandlerResult<Args> {
    let params: Vec<&ParamBindingDescriptor> = registry.params_for(class, method).collect();
    if params.is_empty() {
        return Ok(vec![None; arity.unwrap_or(0)]);
    }

    let highest = params.iter().map(|p| p.index + 1).max().unwrap_or(0);
    let mut args: Args = vec![None; arity.map_or(highest, |arity| arity.max(highest))];

    if params
        .iter()
        .any(|p| matches!(p.binding.source, ParamSource::Body(_)))
    {
        normalize_body(event);
    }

    for param in params {
        args[param.index] = match resolve(&param.binding.source, event, context) {
            Some(raw) => Some(param.binding.parse_value(raw)?),
            None => None,
        };
    }

    debug!(
        class = %class,
        method,
        bound = args.iter().filter(|a| a.is_some()).count(),
        slots = args.len(),
        "Bound parameters"
    );
    Ok(args)
}

/// Raw value of one binding source, before any parse function
pub fn resolve(source: &ParamSource, event: &Value, context: &Value) -> Option<Value> {
    match source {
        ParamSource::Event => Some(event.clone()),
        ParamSource::Context => Some(context.clone()),
        ParamSource::Path(key) => member(event, "pathParameters", key),
        ParamSource::Query(key) => member(event, "queryStringParameters", key),
        ParamSource::Body(key) => {
            if event.get("headers").is_none_or(Value::is_null) {
                return None;
            }
            member(event, "body", key)
        }
        ParamSource::EventValue(path) => lookup_path(event, path).cloned(),
        ParamSource::ContextValue(path) => lookup_path(context, path).cloned(),
        ParamSource::Header(key) => event
            .get("headers")
            .and_then(|headers| header_value(headers, key))
            .cloned(),
    }
}

fn member(event: &Value, container: &str, key: &str) -> Option<Value> {
    event
        .get(container)
        .and_then(|c| c.as_object())
        .and_then(|c| c.get(key))
        .filter(|v| !v.is_null())
        .cloned()
}

/// Parse a string body according to the event's Content-Type
///
/// Form bodies become a map of raw `key=value` pairs, JSON bodies are parsed
/// (a malformed document leaves the body untouched). Either way the unparsed
/// string is kept under [`RAW_BODY_KEY`]. Returns whether the event changed.
/// Events without headers, without a non-empty string body, or with an
/// unrecognised content type are left alone.
pub fn normalize_body(event: &mut Value) -> bool {
    let Some(object) = event.as_object_mut() else {
        return false;
    };
    let Some(content_type) = object
        .get("headers")
        .and_then(|headers| header_value(headers, CONTENT_TYPE))
        .and_then(Value::as_str)
        .map(str::to_ascii_lowercase)
    else {
        return false;
    };
    let raw = match object.get("body") {
        Some(Value::String(raw)) if !raw.is_empty() => raw.clone(),
        _ => return false,
    };

    let parsed = if FORM_CONTENT_TYPES.iter().any(|t| content_type.contains(t)) {
        Some(Value::Object(parse_form(&raw)))
    } else if content_type.contains(JSON_CONTENT_TYPE) {
        match serde_json::from_str::<Value>(&raw) {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(error = %e, "Failed to parse JSON body, keeping raw body");
                None
            }
        }
    } else {
        return false;
    };

    if let Some(body) = parsed {
        object.insert("body".to_string(), body);
    }
    object.insert(RAW_BODY_KEY.to_string(), Value::String(raw));
    true
}

/// `a=1&b=2` into `{"a": "1", "b": "2"}`, splitting each pair on its first `=`
///
/// Values are kept as sent, without percent-decoding. Pairs with no `=` are skipped.
fn parse_form(raw: &str) -> Map<String, Value> {
    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect()
}
