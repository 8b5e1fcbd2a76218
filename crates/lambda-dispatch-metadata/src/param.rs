//! Parameter binding declarations
//!
//! A binding names where a positional method argument comes from in the
//! incoming invocation, plus an optional parse function applied to the raw
//! value once it has been found.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{HandlerError, HandlerResult};

/// Conversion applied to a resolved raw value before it is passed to the method
///
/// Only invoked when a value was actually found; absent values stay absent.
pub type ParseFn = Arc<dyn Fn(Value) -> HandlerResult<Value> + Send + Sync>;

/// Where a bound argument is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSource {
    /// The whole event
    Event,
    /// The whole invocation context
    Context,
    /// `event.pathParameters[key]`
    Path(String),
    /// `event.queryStringParameters[key]`
    Query(String),
    /// A field of the content-type-parsed request body
    Body(String),
    /// Dot-separated path into the event
    EventValue(String),
    /// Dot-separated path into the context
    ContextValue(String),
    /// Case-insensitive request header
    Header(String),
}

impl ParamSource {
    /// Key or path name, absent for whole-event and whole-context bindings
    pub fn key(&self) -> Option<&str> {
        match self {
            ParamSource::Event | ParamSource::Context => None,
            ParamSource::Path(key)
            | ParamSource::Query(key)
            | ParamSource::Body(key)
            | ParamSource::EventValue(key)
            | ParamSource::ContextValue(key)
            | ParamSource::Header(key) => Some(key),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParamSource::Event => "event",
            ParamSource::Context => "context",
            ParamSource::Path(_) => "path",
            ParamSource::Query(_) => "query",
            ParamSource::Body(_) => "body",
            ParamSource::EventValue(_) => "event_value",
            ParamSource::ContextValue(_) => "context_value",
            ParamSource::Header(_) => "header",
        }
    }
}

/// A parameter binding: source plus optional parse function
#[derive(Clone)]
pub struct ParamBinding {
    pub source: ParamSource,
    pub parse: Option<ParseFn>,
}

impl ParamBinding {
    pub fn new(source: ParamSource) -> Self {
        Self {
            source,
            parse: None,
        }
    }

    /// Apply the parse function, if any, to a found raw value
    pub fn parse_value(&self, raw: Value) -> HandlerResult<Value> {
        match &self.parse {
            Some(parse) => parse(raw),
            None => Ok(raw),
        }
    }
}

impl fmt::Debug for ParamBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamBinding")
            .field("source", &self.source)
            .field("parse", &self.parse.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Ready-made parse functions for string-typed request values
pub mod parsers {
    use super::*;

    /// Strings become JSON numbers; numbers pass through
    pub fn number() -> ParseFn {
        Arc::new(|raw: Value| match raw {
            Value::Number(_) => Ok(raw),
            Value::String(ref s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| HandlerError::bad_request(format!("'{}' is not a number", s))),
            other => Err(HandlerError::bad_request(format!("{} is not a number", other))),
        })
    }

    /// Strings become JSON integers; integers pass through
    pub fn integer() -> ParseFn {
        Arc::new(|raw: Value| match raw {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
            Value::String(ref s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| HandlerError::bad_request(format!("'{}' is not an integer", s))),
            other => Err(HandlerError::bad_request(format!("{} is not an integer", other))),
        })
    }

    /// `"true"` / `"false"` become booleans; booleans pass through
    pub fn boolean() -> ParseFn {
        Arc::new(|raw: Value| match raw {
            Value::Bool(_) => Ok(raw),
            Value::String(ref s) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(HandlerError::bad_request(format!("'{}' is not a boolean", s))),
            },
            other => Err(HandlerError::bad_request(format!("{} is not a boolean", other))),
        })
    }

    /// Strings are parsed as JSON documents
    pub fn json() -> ParseFn {
        Arc::new(|raw: Value| match raw {
            Value::String(s) => serde_json::from_str(&s).map_err(|e| HandlerError::from(e).status(400)),
            other => Ok(other),
        })
    }
}
