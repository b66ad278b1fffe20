//! Instance service
//!
//! Run/terminate/describe for compute instances, plus wait helpers that
//! bridge the platform's asynchronous state transitions: a successful `run`
//! only means the instance is `starting`, and a successful `terminate` only
//! means it began terminating. Callers that need the final state poll a
//! describe through [`Wait`].

use crate::error::{ProvisionError, Result};
use crate::methods;
use crate::request::DefaultRequestParams;
use crate::state::InstanceState;
use crate::wait::Wait;
use maestro_client::{call, Transporter};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "instanceId")]
    pub instance_id: String,
    #[serde(default)]
    pub cloud: String,
    #[serde(rename = "instanceName", default)]
    pub instance_name: String,
    #[serde(rename = "tenant", default)]
    pub tenant_name: String,
    #[serde(default)]
    pub region: String,
    pub state: InstanceState,
    #[serde(rename = "creationDate", default)]
    pub created: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(rename = "imageId", default)]
    pub image: String,
    #[serde(rename = "instanceType", default)]
    pub shape: String,
    #[serde(rename = "privateIpAddress", default)]
    pub private_ip: String,
    #[serde(rename = "lockedTermination", default)]
    pub locked_termination: bool,
    #[serde(rename = "availabilityZone", default)]
    pub availability_zone: String,
    #[serde(rename = "resourceGroup", default)]
    pub resource_group: String,
    #[serde(rename = "volumesIds", default)]
    pub volumes_ids: Vec<String>,
    #[serde(rename = "additionalData", default)]
    pub additional_data: HashMap<String, Value>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// `data` payload of instance responses
#[derive(Debug, Default, Deserialize)]
struct InstancesResultData {
    #[serde(default)]
    instances: Vec<Instance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceRunRequest {
    #[serde(flatten)]
    pub params: DefaultRequestParams,
    #[serde(rename = "instanceName")]
    pub instance_name: String,
    #[serde(rename = "keyName")]
    pub key_name: String,
    #[serde(rename = "imageId")]
    pub image: String,
    pub shape: String,
    pub owner: String,
    pub count: u32,
    #[serde(rename = "installChefClient")]
    pub chef_enabled: bool,
    // wire name carries the platform's historical misspelling
    #[serde(rename = "insanceChefUuid", skip_serializing_if = "String::is_empty")]
    pub instance_chef_uuid: String,
    #[serde(rename = "chefProfile", skip_serializing_if = "String::is_empty")]
    pub chef_profile: String,
    #[serde(rename = "stopAfter", skip_serializing_if = "Option::is_none")]
    pub stop_after: Option<u32>,
    #[serde(rename = "terminateAfter", skip_serializing_if = "Option::is_none")]
    pub terminate_after: Option<u32>,
    #[serde(rename = "lockedTermination")]
    pub locked_termination: bool,
    #[serde(rename = "additionalData", skip_serializing_if = "HashMap::is_empty")]
    pub additional_data: HashMap<String, Value>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceTerminateRequest {
    #[serde(flatten)]
    pub params: DefaultRequestParams,
    #[serde(rename = "instanceId")]
    pub instance_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceDescribeRequest {
    #[serde(flatten)]
    pub params: DefaultRequestParams,
    #[serde(rename = "instanceIds")]
    pub instance_ids: Vec<String>,
}

pub struct InstanceService {
    transporter: Arc<dyn Transporter>,
}

impl InstanceService {
    pub fn new(transporter: Arc<dyn Transporter>) -> Self {
        Self { transporter }
    }

    /// Launch an instance
    ///
    /// The platform answers before provisioning finishes; the returned
    /// instance must be `starting`, anything else is a broken handoff.
    pub async fn run(&self, request: &InstanceRunRequest) -> Result<Instance> {
        let result = call(&*self.transporter, request, methods::RUN_INSTANCE).await?;
        let data: InstancesResultData = result.decode()?;
        let instance = data
            .instances
            .into_iter()
            .next()
            .ok_or(ProvisionError::MissingResult)?;

        if instance.state != InstanceState::Starting {
            return Err(ProvisionError::UnexpectedState {
                expected: InstanceState::Starting.to_string(),
                actual: instance.state.to_string(),
            });
        }
        Ok(instance)
    }

    /// Begin terminating an instance
    ///
    /// Not-found is surfaced as such; the instance may already have been
    /// terminated from the web UI.
    pub async fn terminate(&self, request: &InstanceTerminateRequest) -> Result<()> {
        let result = call(&*self.transporter, request, methods::TERMINATE_INSTANCE).await?;
        result.ack()?;
        Ok(())
    }

    pub async fn describe(&self, request: &InstanceDescribeRequest) -> Result<Instance> {
        let result = call(&*self.transporter, request, methods::DESCRIBE_INSTANCE).await?;
        let data: InstancesResultData = result.decode()?;
        // an empty list means the instance is gone, not a malformed reply
        data.instances
            .into_iter()
            .next()
            .ok_or(ProvisionError::Client(maestro_client::ClientError::NotFound))
    }

    /// Disable termination protection on an instance
    pub async fn unlock_termination(&self, request: &InstanceTerminateRequest) -> Result<()> {
        #[derive(Serialize)]
        struct ProtectionRequest<'a> {
            #[serde(flatten)]
            request: &'a InstanceTerminateRequest,
            action: &'static str,
        }

        let body = ProtectionRequest {
            request,
            action: "DISABLE",
        };
        let result = call(&*self.transporter, &body, methods::TERMINATION_PROTECTION).await?;
        result.ack()?;
        Ok(())
    }

    /// Poll describe until the instance reaches `target`
    pub async fn await_state(
        &self,
        request: &InstanceDescribeRequest,
        target: InstanceState,
        wait: &Wait,
    ) -> Result<Instance> {
        wait.until_ready(|| async move {
            let instance = self.describe(request).await?;
            if instance.state != target {
                return Err(ProvisionError::UnexpectedState {
                    expected: target.to_string(),
                    actual: instance.state.to_string(),
                });
            }
            Ok(instance)
        })
        .await
    }

    /// Poll describe until the instance disappears
    pub async fn await_termination(
        &self,
        request: &InstanceDescribeRequest,
        wait: &Wait,
    ) -> Result<()> {
        wait.until_gone(|| self.describe(request)).await
    }
}
