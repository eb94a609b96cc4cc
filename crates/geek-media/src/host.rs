//! The image host seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::image::{public_id_from_url, ImageData};

/// An image stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Public delivery URL, stored on the product.
    pub url: String,
    pub public_id: String,
}

/// Remote storage for product images.
#[async_trait(?Send)]
pub trait ImageHost {
    async fn upload(&self, image: &ImageData) -> Result<UploadedImage, MediaError>;

    /// Remove an image. Removing an image that is already gone succeeds.
    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;

    /// Public id of an image from its delivery URL.
    fn public_id_for(&self, url: &str) -> Result<String, MediaError> {
        public_id_from_url(url)
    }

    /// Remove the image behind a delivery URL, returning its public id.
    async fn destroy_url(&self, url: &str) -> Result<String, MediaError> {
        let public_id = self.public_id_for(url)?;
        self.destroy(&public_id).await?;
        Ok(public_id)
    }
}
