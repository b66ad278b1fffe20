//! Signed, encrypted HTTP transport
//!
//! Turns a logical [`Payload`] into a one-element batch, encrypts and signs
//! it, POSTs it to the configured endpoint and decrypts/parses the batched
//! response. No retries happen here; every failure is classified and
//! returned immediately.

use crate::config::Config;
use crate::crypto;
use crate::envelope::{BatchResult, Payload, RawResult};
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const HEADER_AUTHENTICATION: &str = "maestro-authentication";
const HEADER_CLIENT_IDENTIFIER: &str = "maestro-request-identifier";
const HEADER_USER_IDENTIFIER: &str = "maestro-user-identifier";
const HEADER_DATE: &str = "maestro-date";
const HEADER_ACCESS_KEY: &str = "maestro-accesskey";
const HEADER_SDK_VERSION: &str = "maestro-sdk-version";
const HEADER_ASYNC: &str = "maestro-sdk-async";

const VALUE_CLIENT_IDENTIFIER: &str = "terraform-provider";
const VALUE_SDK_VERSION: &str = "3.2.80";
const VALUE_ASYNC: &str = "false";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Executes envelopes against the platform
///
/// The seam between resource services and the wire: services hold a
/// `dyn Transporter` so tests can substitute a canned transport.
#[async_trait]
pub trait Transporter: Send + Sync {
    /// Submit one payload as a single-element batch and return the parsed
    /// batch result
    async fn execute(&self, payload: Payload) -> Result<BatchResult>;
}

/// The service call pattern: build payload, execute, unwrap the single result
pub async fn call<T: Serialize + Sync>(
    transporter: &dyn Transporter,
    request: &T,
    method: &str,
) -> Result<RawResult> {
    let payload = Payload::new(request, method)?;
    let batch = transporter.execute(payload).await?;
    batch.into_single()
}

/// HTTP transport over a shared session [`Config`]
pub struct Transport {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl Transport {
    /// Build the transport and its HTTP client
    ///
    /// The client uses a 2-minute timeout; certificate verification is
    /// skipped only when the config explicitly asks for it.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::RequestBuild(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Serialize, encrypt and sign `payload` into a ready-to-send request
    fn create_request(&self, payload: &Payload) -> Result<reqwest::Request> {
        let batch = [payload];
        let request_json = serde_json::to_vec(&batch).map_err(ClientError::Serialization)?;
        tracing::debug!(
            action = %payload.action,
            id = %payload.id,
            "request data:\n{}",
            pretty(&request_json)
        );

        let encrypted = crypto::encrypt(self.config.secret_key.as_bytes(), &request_json)?;

        let date = Utc::now().timestamp_millis().to_string();
        let signature =
            crypto::generate_signature(&self.config.secret_key, &self.config.access_key, &date);

        self.client
            .post(&self.config.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONNECTION, "close")
            .header(HEADER_AUTHENTICATION, signature)
            .header(HEADER_CLIENT_IDENTIFIER, VALUE_CLIENT_IDENTIFIER)
            .header(HEADER_USER_IDENTIFIER, &self.config.user_identifier)
            .header(HEADER_DATE, date)
            .header(HEADER_ACCESS_KEY, &self.config.access_key)
            .header(HEADER_SDK_VERSION, VALUE_SDK_VERSION)
            .header(HEADER_ASYNC, VALUE_ASYNC)
            .body(encrypted)
            .build()
            .map_err(|e| ClientError::RequestBuild(e.to_string()))
    }
}

#[async_trait]
impl Transporter for Transport {
    async fn execute(&self, payload: Payload) -> Result<BatchResult> {
        let request = self.create_request(&payload)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ClientError::Network)?;

        let status = response.status();
        let raw = response.bytes().await.map_err(ClientError::ResponseRead)?;

        if status.as_u16() != 200 {
            return Err(ClientError::Protocol {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&raw).into_owned(),
            });
        }

        let body = std::str::from_utf8(&raw)
            .map_err(|e| ClientError::Decryption(format!("response is not utf-8: {e}")))?;
        let plaintext = crypto::decrypt(self.config.secret_key.as_bytes(), body)?;
        tracing::debug!("response data:\n{}", pretty(&plaintext));

        serde_json::from_slice(&plaintext).map_err(ClientError::Deserialization)
    }
}

/// Best-effort pretty-printing for diagnostic logs
fn pretty(bytes: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}
