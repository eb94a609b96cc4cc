//! Product image hosting for the AluraGeek catalog.
//!
//! Admin requests carry product images inline as base64 data URIs. This
//! crate validates them ([`ImageData`]), stores them on an [`ImageHost`]
//! (Cloudinary in production) and removes images that are no longer
//! referenced.
//!
//! # Example
//!
//! ```rust,ignore
//! use geek_media::prelude::*;
//!
//! let host = CloudinaryHost::new(config);
//! let image = ImageData::parse(&request.base64_image)?;
//! let uploaded = host.upload(&image).await?;
//!
//! // later, once the product points elsewhere
//! host.destroy_url(&previous_url).await?;
//! ```

pub mod cloudinary;
pub mod error;
pub mod fetch;
pub mod host;
pub mod image;
#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use cloudinary::{CloudinaryConfig, CloudinaryHost};
pub use error::{FetchError, MediaError};
pub use fetch::{FetchClient, Method, Response};
pub use host::{ImageHost, UploadedImage};
pub use image::{public_id_from_url, ImageData, MAX_IMAGE_BYTES};
#[cfg(any(test, feature = "testing"))]
pub use memory::MemoryImageHost;

pub mod prelude {
    pub use crate::cloudinary::{CloudinaryConfig, CloudinaryHost};
    pub use crate::error::MediaError;
    pub use crate::host::{ImageHost, UploadedImage};
    pub use crate::image::ImageData;
}
