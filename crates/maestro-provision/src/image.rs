//! Image service

use crate::error::{ProvisionError, Result};
use crate::methods;
use crate::request::DefaultRequestParams;
use maestro_client::{call, ClientError, Transporter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// State of an image ready to launch instances from
pub const AVAILABLE_STATE: &str = "Available";
/// State of an image still attached to a build in progress
pub const IN_USE_STATE: &str = "in-use";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "tenant", default)]
    pub tenant_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "createdDate", default)]
    pub created_date: i64,
    #[serde(rename = "imageId")]
    pub image_id: String,
    #[serde(rename = "osType", default)]
    pub os_type: String,
    #[serde(rename = "imageType", default)]
    pub image_type: String,
    #[serde(rename = "imageState", default)]
    pub state: String,
    #[serde(default)]
    pub cloud: String,
    #[serde(default)]
    pub owner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageCreateRequest {
    #[serde(flatten)]
    pub params: DefaultRequestParams,
    #[serde(rename = "instanceId")]
    pub instance_id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageDeleteRequest {
    #[serde(flatten)]
    pub params: DefaultRequestParams,
    #[serde(rename = "imageId")]
    pub image_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageDescribeRequest {
    #[serde(flatten)]
    pub params: DefaultRequestParams,
    #[serde(rename = "imageIds")]
    pub image_ids: Vec<String>,
}

pub struct ImageService {
    transporter: Arc<dyn Transporter>,
}

impl ImageService {
    pub fn new(transporter: Arc<dyn Transporter>) -> Self {
        Self { transporter }
    }

    /// Create an image from a running instance
    ///
    /// Image creation is asynchronous; the returned image stays in
    /// `in-use` until the platform finishes, so callers poll `describe`
    /// for `Available`.
    pub async fn create(&self, request: &ImageCreateRequest) -> Result<Image> {
        let result = call(&*self.transporter, request, methods::CREATE_IMAGE).await?;
        let images: Vec<Image> = result.decode()?;
        images.into_iter().next().ok_or(ProvisionError::MissingResult)
    }

    pub async fn delete(&self, request: &ImageDeleteRequest) -> Result<()> {
        let result = call(&*self.transporter, request, methods::DELETE_IMAGE).await?;
        result.ack()?;
        Ok(())
    }

    /// Describe a single image by the first id in the request
    ///
    /// The platform answers with every image it knows for the scope, so
    /// the match happens client-side; no match means the image is gone.
    pub async fn describe(&self, request: &ImageDescribeRequest) -> Result<Image> {
        let result = call(&*self.transporter, request, methods::DESCRIBE_IMAGE).await?;
        let images: Vec<Image> = result.decode()?;
        let wanted = request.image_ids.first().ok_or(ProvisionError::MissingResult)?;
        images
            .into_iter()
            .find(|image| &image.image_id == wanted)
            .ok_or(ProvisionError::Client(ClientError::NotFound))
    }
}
