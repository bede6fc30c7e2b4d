//! Lenient JSON body extraction
//!
//! Harness clients do not always send a content type, and several endpoints
//! are called with no body at all. An empty body reads as `{}`; anything
//! else must parse as JSON.

use crate::error::ApiError;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value};

/// Request body parsed as an arbitrary JSON document
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl JsonBody {
    pub fn parse(bytes: &[u8]) -> Result<Self, ApiError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Object(Map::new())));
        }
        serde_json::from_slice(bytes)
            .map(Self)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Self::parse(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_empty_object() {
        assert_eq!(JsonBody::parse(b"").unwrap().0, json!({}));
        assert_eq!(JsonBody::parse(b" \n").unwrap().0, json!({}));
    }

    #[test]
    fn test_any_json_document() {
        assert_eq!(JsonBody::parse(b"[1,2]").unwrap().0, json!([1, 2]));
        assert_eq!(JsonBody::parse(b"\"raw\"").unwrap().0, json!("raw"));
        assert!(matches!(
            JsonBody::parse(b"{ not json"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
