//! Keypair service
//!
//! A keypair is scoped either to one tenant or to all tenants; the two are
//! mutually exclusive on the wire, so the request models them as a
//! [`KeypairScope`] union flattened into the surrounding JSON.

use crate::error::{ProvisionError, Result};
use crate::methods;
use maestro_client::{call, ClientError, Transporter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keypair {
    #[serde(rename = "tenant", default)]
    pub tenant_name: String,
    #[serde(default)]
    pub region: String,
    pub name: String,
    #[serde(rename = "publicPart", default)]
    pub public_part: String,
    #[serde(rename = "privatePart", default)]
    pub private_part: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cloud: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(rename = "allTenants", default)]
    pub all_tenants: bool,
}

/// Mutually exclusive scoping of a keypair
///
/// Serializes to the flattened shape the platform expects: either a
/// `tenantName` field or an `allTenants` flag, never both.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum KeypairScope {
    ByTenant {
        #[serde(rename = "tenantName")]
        tenant_name: String,
    },
    AllTenants {
        #[serde(rename = "allTenants")]
        all_tenants: bool,
    },
}

impl KeypairScope {
    pub fn by_tenant(tenant_name: impl Into<String>) -> Self {
        Self::ByTenant {
            tenant_name: tenant_name.into(),
        }
    }

    pub fn all_tenants() -> Self {
        Self::AllTenants { all_tenants: true }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KeypairRequest {
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub scope: KeypairScope,
    /// Public key material, only sent on create
    #[serde(rename = "publicKey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Restrict the keypair to one cloud
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,
}

pub struct KeypairService {
    transporter: Arc<dyn Transporter>,
}

impl KeypairService {
    pub fn new(transporter: Arc<dyn Transporter>) -> Self {
        Self { transporter }
    }

    pub async fn create(&self, request: &KeypairRequest) -> Result<Keypair> {
        let result = call(&*self.transporter, request, methods::CREATE_KEYPAIR).await?;
        Ok(result.decode()?)
    }

    /// Describe a keypair by name
    ///
    /// The platform lists every keypair visible to the caller; the name
    /// match happens client-side.
    pub async fn describe(&self, request: &KeypairRequest) -> Result<Keypair> {
        let result = call(&*self.transporter, request, methods::DESCRIBE_KEYPAIR).await?;
        let keypairs: Vec<Keypair> = result.decode()?;
        keypairs
            .into_iter()
            .find(|keypair| keypair.name == request.name)
            .ok_or(ProvisionError::Client(ClientError::NotFound))
    }

    pub async fn delete(&self, request: &KeypairRequest) -> Result<()> {
        let result = call(&*self.transporter, request, methods::DELETE_KEYPAIR).await?;
        result.ack()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use maestro_client::RawResult;
    use serde_json::json;

    fn request(scope: KeypairScope) -> KeypairRequest {
        KeypairRequest {
            name: "deploy".into(),
            email: "user@test".into(),
            scope,
            public_key: None,
            cloud: None,
        }
    }

    #[test]
    fn test_scope_serializes_flattened() {
        let by_tenant = serde_json::to_value(request(KeypairScope::by_tenant("tenant-1"))).unwrap();
        assert_eq!(by_tenant["tenantName"], "tenant-1");
        assert!(by_tenant.get("allTenants").is_none());

        let all = serde_json::to_value(request(KeypairScope::all_tenants())).unwrap();
        assert_eq!(all["allTenants"], true);
        assert!(all.get("tenantName").is_none());
    }

    #[test]
    fn test_optional_fields_omitted_when_unset() {
        let wire = serde_json::to_value(request(KeypairScope::all_tenants())).unwrap();
        assert!(wire.get("publicKey").is_none());
        assert!(wire.get("cloud").is_none());

        let mut full = request(KeypairScope::all_tenants());
        full.public_key = Some("ssh-ed25519 AAAA".into());
        full.cloud = Some("AWS".into());
        let wire = serde_json::to_value(full).unwrap();
        assert_eq!(wire["publicKey"], "ssh-ed25519 AAAA");
        assert_eq!(wire["cloud"], "AWS");
    }

    #[tokio::test]
    async fn test_describe_finds_by_name() {
        let transport = Arc::new(MockTransport::with_results(vec![RawResult {
            data: json!([
                {"name": "other", "fingerprint": "aa:bb"},
                {"name": "deploy", "fingerprint": "cc:dd"},
            ])
            .to_string(),
            ..Default::default()
        }]));
        let service = KeypairService::new(transport);

        let keypair = service
            .describe(&request(KeypairScope::by_tenant("tenant-1")))
            .await
            .unwrap();
        assert_eq!(keypair.fingerprint, "cc:dd");
    }

    #[tokio::test]
    async fn test_describe_missing_name_is_not_found() {
        let transport = Arc::new(MockTransport::with_results(vec![RawResult {
            data: json!([{"name": "other"}]).to_string(),
            ..Default::default()
        }]));
        let service = KeypairService::new(transport);

        let err = service
            .describe(&request(KeypairScope::all_tenants()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_decodes_single_object() {
        let transport = Arc::new(MockTransport::with_results(vec![RawResult {
            data: json!({"name": "deploy", "fingerprint": "aa:bb"}).to_string(),
            ..Default::default()
        }]));
        let service = KeypairService::new(transport.clone());

        let mut create = request(KeypairScope::by_tenant("tenant-1"));
        create.public_key = Some("ssh-ed25519 AAAA".into());
        let keypair = service.create(&create).await.unwrap();

        assert_eq!(keypair.fingerprint, "aa:bb");
        assert_eq!(transport.last_action().as_deref(), Some("ADD_KEY"));
    }

    #[tokio::test]
    async fn test_delete_acknowledges_status_only() {
        let transport = Arc::new(MockTransport::with_results(vec![RawResult {
            status: "SUCCESS".into(),
            ..Default::default()
        }]));
        let service = KeypairService::new(transport);

        service
            .delete(&request(KeypairScope::all_tenants()))
            .await
            .unwrap();
    }
}
