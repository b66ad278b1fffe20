//! Wire envelope and batch result shapes
//!
//! Every logical request is wrapped in a [`Payload`] and submitted as a
//! one-element batch; the server answers with a [`BatchResult`] carrying
//! exactly one [`RawResult`] per submitted payload. A result is well-formed
//! only if at least one of `error` or `data` is populated.

use crate::error::{ClientError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error phrases the platform uses for missing resources.
///
/// Matched case-insensitively in one place so callers can rely on
/// [`ClientError::NotFound`] instead of comparing error strings.
const NOT_FOUND_PHRASES: &[&str] = &["no unique image found by image id"];

/// Carrier for the JSON-encoded request body inside a [`Payload`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    pub body: String,
}

/// Request envelope for a single remote action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payload {
    /// Fresh time-ordered correlation id, unique per request
    pub id: String,
    /// Remote operation name, e.g. `RUN_INSTANCE`
    #[serde(rename = "type")]
    pub action: String,
    pub params: Params,
}

impl Payload {
    /// Build an envelope around `params`, serialized to JSON as the body
    pub fn new<T: Serialize>(params: &T, method: &str) -> Result<Self> {
        let body = serde_json::to_string(params).map_err(ClientError::Serialization)?;
        Ok(Self {
            id: Uuid::now_v7().to_string(),
            action: method.to_string(),
            params: Params { body },
        })
    }
}

/// Server-side outcome of a single submitted payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default)]
    pub data: String,
    #[serde(rename = "statusCode", default)]
    pub status_code: i32,
}

impl RawResult {
    /// Whether this result signals a missing resource
    ///
    /// Structured replacement for the original provider's `"404"` string
    /// sentinel: a 404 status code or a recognized error phrase.
    pub fn is_not_found(&self) -> bool {
        if self.status_code == 404 {
            return true;
        }
        let error = self.error.to_ascii_lowercase();
        NOT_FOUND_PHRASES.iter().any(|phrase| error.contains(phrase))
    }

    /// Classify a populated `error` field
    fn remote_error(&self) -> ClientError {
        if self.is_not_found() {
            ClientError::NotFound
        } else {
            ClientError::Remote(self.error.clone())
        }
    }

    /// Deserialize `data` into the entity-specific shape
    ///
    /// A populated `error` surfaces as [`ClientError::Remote`] (or
    /// [`ClientError::NotFound`]); empty `error` and empty `data` is a
    /// protocol violation.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if !self.error.is_empty() {
            return Err(self.remote_error());
        }
        if self.data.is_empty() {
            return Err(ClientError::EmptyResponse);
        }
        serde_json::from_str(&self.data).map_err(ClientError::Deserialization)
    }

    /// Check a status-only result (delete-style operations carry no data)
    pub fn ack(&self) -> Result<()> {
        if !self.error.is_empty() {
            return Err(self.remote_error());
        }
        if self.status.is_empty() && self.data.is_empty() {
            return Err(ClientError::EmptyResponse);
        }
        Ok(())
    }
}

/// Ordered results for a submitted batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<RawResult>,
}

impl BatchResult {
    /// Extract the single result of a one-element batch
    ///
    /// The client only ever submits batches of size 1, so an empty results
    /// array is a protocol violation.
    pub fn into_single(mut self) -> Result<RawResult> {
        if self.results.is_empty() {
            return Err(ClientError::EmptyResponse);
        }
        Ok(self.results.swap_remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct RunParams {
        region: String,
        count: u32,
    }

    #[test]
    fn test_payload_shape() {
        let params = RunParams {
            region: "eu-west".into(),
            count: 2,
        };
        let payload = Payload::new(&params, "RUN_INSTANCE").unwrap();

        assert_eq!(payload.action, "RUN_INSTANCE");
        assert!(!payload.id.is_empty());
        let body: RunParams = serde_json::from_str(&payload.params.body).unwrap();
        assert_eq!(body, params);

        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(wire["type"], "RUN_INSTANCE");
        assert!(wire["params"]["body"].is_string());
    }

    #[test]
    fn test_payload_ids_differ() {
        let a = Payload::new(&json!({}), "DESCRIBE_KEYS").unwrap();
        let b = Payload::new(&json!({}), "DESCRIBE_KEYS").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_decode_data() {
        let result = RawResult {
            data: r#"{"region":"eu-west","count":1}"#.into(),
            status: "SUCCESS".into(),
            ..Default::default()
        };
        let decoded: RunParams = result.decode().unwrap();
        assert_eq!(decoded.count, 1);
    }

    #[test]
    fn test_decode_remote_error() {
        let result = RawResult {
            error: "quota exceeded".into(),
            ..Default::default()
        };
        let err = result.decode::<RunParams>().unwrap_err();
        assert!(matches!(err, ClientError::Remote(msg) if msg == "quota exceeded"));
    }

    #[test]
    fn test_decode_empty_is_protocol_violation() {
        let result = RawResult::default();
        assert!(matches!(
            result.decode::<RunParams>(),
            Err(ClientError::EmptyResponse)
        ));
        assert!(matches!(result.ack(), Err(ClientError::EmptyResponse)));
    }

    #[test]
    fn test_not_found_from_status_code() {
        let result = RawResult {
            error: "instance vanished".into(),
            status_code: 404,
            ..Default::default()
        };
        assert!(result.is_not_found());
        assert!(matches!(
            result.decode::<RunParams>(),
            Err(ClientError::NotFound)
        ));
    }

    #[test]
    fn test_not_found_from_error_phrase() {
        // the platform emits this phrase with varying capitalization
        for phrase in [
            "no unique image found by image ID",
            "No unique image found by image ID",
        ] {
            let result = RawResult {
                error: phrase.into(),
                ..Default::default()
            };
            assert!(result.is_not_found(), "{phrase}");
        }
    }

    #[test]
    fn test_ack_on_status_only_result() {
        let result = RawResult {
            status: "SUCCESS".into(),
            ..Default::default()
        };
        assert!(result.ack().is_ok());
    }

    #[test]
    fn test_into_single() {
        let batch = BatchResult {
            results: vec![RawResult {
                id: "r-1".into(),
                status: "SUCCESS".into(),
                data: "{}".into(),
                ..Default::default()
            }],
        };
        assert_eq!(batch.into_single().unwrap().id, "r-1");

        let empty = BatchResult::default();
        assert!(matches!(
            empty.into_single(),
            Err(ClientError::EmptyResponse)
        ));
    }
}
