//! In-memory image host for tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::MediaError;
use crate::host::{ImageHost, UploadedImage};
use crate::image::ImageData;

const BASE_URL: &str = "https://res.cloudinary.com/memory/image/upload/v1/alura-geek";

#[derive(Debug, Default)]
struct State {
    uploads: Vec<UploadedImage>,
    destroyed: Vec<String>,
    fail_uploads: bool,
    fail_destroys: bool,
}

/// Records uploads and destroys instead of talking to a host.
#[derive(Debug, Default)]
pub struct MemoryImageHost {
    state: Mutex<State>,
}

impl MemoryImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.with_state(|state| state.fail_uploads = fail);
    }

    pub fn fail_destroys(&self, fail: bool) {
        self.with_state(|state| state.fail_destroys = fail);
    }

    pub fn uploads(&self) -> Vec<UploadedImage> {
        self.with_state(|state| state.uploads.clone())
    }

    /// Public ids destroyed so far, in order.
    pub fn destroyed(&self) -> Vec<String> {
        self.with_state(|state| state.destroyed.clone())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state)
    }
}

#[async_trait(?Send)]
impl ImageHost for MemoryImageHost {
    async fn upload(&self, image: &ImageData) -> Result<UploadedImage, MediaError> {
        self.with_state(|state| {
            if state.fail_uploads {
                return Err(MediaError::Upload("upload disabled".into()));
            }
            let name = format!("image-{}", state.uploads.len() + 1);
            let extension = image.mime_type().trim_start_matches("image/");
            let uploaded = UploadedImage {
                url: format!("{BASE_URL}/{name}.{extension}"),
                public_id: format!("alura-geek/{name}"),
            };
            state.uploads.push(uploaded.clone());
            Ok(uploaded)
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        self.with_state(|state| {
            if state.fail_destroys {
                return Err(MediaError::Destroy(format!("{public_id}: destroy disabled")));
            }
            state.destroyed.push(public_id.to_string());
            Ok(())
        })
    }
}
