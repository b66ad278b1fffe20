//! Request fields shared by every resource operation

use serde::{Deserialize, Serialize};

/// Region/tenant scoping carried by every resource request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultRequestParams {
    pub region: String,
    #[serde(rename = "tenantName")]
    pub tenant_name: String,
}

impl DefaultRequestParams {
    pub fn new(region: impl Into<String>, tenant_name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            tenant_name: tenant_name.into(),
        }
    }
}
