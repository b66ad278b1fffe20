//! Session configuration
//!
//! One [`Config`] is built per client session, validated once and shared
//! (read-only) across every call issued through that session.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};

const ENV_URL: &str = "TERRAFORM_M3_URL";
const ENV_USER_IDENTIFIER: &str = "TERRAFORM_M3_USER_IDENTIFIER";
const ENV_ACCESS_KEY: &str = "TERRAFORM_M3_ACCESS_KEY";
const ENV_SECRET_KEY: &str = "TERRAFORM_M3_SECRET_KEY";
const ENV_TENANT_NAME: &str = "TERRAFORM_M3_TENANT_NAME";
const ENV_REGION_NAME: &str = "TERRAFORM_M3_REGION_NAME";
const ENV_CLOUD: &str = "TERRAFORM_M3_CLOUD";

/// Credentials and scoping for a Maestro API session
///
/// The secret key is dual-purpose: it is the AES key for request/response
/// body encryption and the HMAC key material for request signing, so its
/// length must be a valid AES key size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub url: String,
    pub access_key: String,
    pub secret_key: String,
    pub user_identifier: String,

    /// Default tenant for resource operations that do not name one
    pub tenant_name: String,
    pub region_name: String,
    pub cloud: String,

    /// Skip TLS certificate verification on the transport.
    ///
    /// The original provider disabled verification unconditionally; here it
    /// is opt-in so the insecure behavior has to be requested explicitly.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Config {
    /// Create a config from already-resolved values
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        url: impl Into<String>,
        user_identifier: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        tenant_name: impl Into<String>,
        region_name: impl Into<String>,
        cloud: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            url: url.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            user_identifier: user_identifier.into(),
            tenant_name: tenant_name.into(),
            region_name: region_name.into(),
            cloud: cloud.into(),
            accept_invalid_certs: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a config from the `TERRAFORM_M3_*` environment variables
    ///
    /// URL, user identifier, access key and secret key are required;
    /// tenant, region and cloud default to empty.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            url: require_env(ENV_URL)?,
            user_identifier: require_env(ENV_USER_IDENTIFIER)?,
            access_key: require_env(ENV_ACCESS_KEY)?,
            secret_key: require_env(ENV_SECRET_KEY)?,
            tenant_name: std::env::var(ENV_TENANT_NAME).unwrap_or_default(),
            region_name: std::env::var(ENV_REGION_NAME).unwrap_or_default(),
            cloud: std::env::var(ENV_CLOUD).unwrap_or_default(),
            accept_invalid_certs: false,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        match self.secret_key.len() {
            16 | 24 | 32 => Ok(()),
            n => Err(ClientError::InvalidKeyLength(n)),
        }
    }
}

fn require_env(name: &'static str) -> Result<String> {
    std::env::var(name).map_err(|_| ClientError::MissingEnv(name))
}
