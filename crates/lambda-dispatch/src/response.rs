//! HTTP-style response convention

use std::collections::BTreeMap;

use lambda_dispatch_metadata::Value;
use serde::Serialize;
use serde_json::{Map, json};

/// `{statusCode, body, headers?}` response of an HTTP-triggered function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

impl HttpResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            headers: None,
        }
    }

    /// 200 with a JSON body
    pub fn ok<T: Serialize>(body: &T) -> serde_json::Result<Self> {
        Self::json(200, body)
    }

    /// JSON body with a content-type header
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> serde_json::Result<Self> {
        Ok(Self::new(status_code, serde_json::to_string(body)?)
            .with_header("Content-Type", "application/json"))
    }

    /// `{"message": ...}` body, the shape of status-code error responses
    pub fn message(status_code: u16, message: &str) -> Self {
        Self::new(status_code, json!({ "message": message }).to_string())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn into_value(self) -> Value {
        let mut response = Map::new();
        response.insert("statusCode".to_string(), Value::from(self.status_code));
        response.insert("body".to_string(), Value::String(self.body));
        if let Some(headers) = self.headers {
            response.insert(
                "headers".to_string(),
                Value::Object(
                    headers
                        .into_iter()
                        .map(|(name, value)| (name, Value::String(value)))
                        .collect(),
                ),
            );
        }
        Value::Object(response)
    }
}

impl From<HttpResponse> for Value {
    fn from(response: HttpResponse) -> Self {
        response.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response() {
        assert_eq!(
            HttpResponse::message(404, "User not found").into_value(),
            json!({"statusCode": 404, "body": "{\"message\":\"User not found\"}"})
        );
    }

    #[test]
    fn test_json_response_matches_serialised_form() {
        let response = HttpResponse::ok(&json!({"id": 1})).unwrap();
        let expected = json!({
            "statusCode": 200,
            "body": "{\"id\":1}",
            "headers": {"Content-Type": "application/json"}
        });
        assert_eq!(serde_json::to_value(&response).unwrap(), expected);
        assert_eq!(Value::from(response), expected);
    }
}
