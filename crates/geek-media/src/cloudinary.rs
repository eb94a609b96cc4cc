//! Cloudinary upload API client.
//!
//! Uploads and destroys are signed: the request parameters (minus
//! `file`, `api_key` and the signature fields) are sorted by name, joined
//! as `k=v&k=v`, suffixed with the API secret and hashed with SHA-256.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::error::{FetchError, MediaError};
use crate::fetch::FetchClient;
use crate::host::{ImageHost, UploadedImage};
use crate::image::ImageData;

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_preset: Option<String>,
    pub folder: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CloudinaryHost {
    config: CloudinaryConfig,
    client: FetchClient,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Hex SHA-256 signature of `params` for `secret`.
pub fn sign(params: &BTreeMap<&str, String>, secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    pub fn with_api_base(config: CloudinaryConfig, api_base: &str) -> Self {
        let client = FetchClient::new()
            .with_base_url(format!(
                "{}/v1_1/{}",
                api_base.trim_end_matches('/'),
                config.cloud_name
            ))
            .with_default_header("Accept", "application/json");
        Self { config, client }
    }

    pub fn config(&self) -> &CloudinaryConfig {
        &self.config
    }

    /// Form fields of a signed upload.
    pub fn upload_form(&self, image: &ImageData, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = BTreeMap::new();
        params.insert("timestamp", timestamp.to_string());
        if let Some(preset) = &self.config.upload_preset {
            params.insert("upload_preset", preset.clone());
        }
        if let Some(folder) = &self.config.folder {
            params.insert("folder", folder.clone());
        }

        let mut form = vec![("file", image.data_uri().to_string())];
        form.extend(self.signed(params));
        form
    }

    /// Form fields of a signed destroy.
    pub fn destroy_form(&self, public_id: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", timestamp.to_string());
        self.signed(params)
    }

    fn signed(&self, params: BTreeMap<&'static str, String>) -> Vec<(&'static str, String)> {
        let signature = sign(&params, &self.config.api_secret);
        let mut form: Vec<_> = params.into_iter().collect();
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));
        form.push(("signature_algorithm", "sha256".to_string()));
        form
    }
}

/// Message of a Cloudinary error body, or the raw status error.
fn api_error(err: FetchError) -> String {
    match err {
        FetchError::HttpError { status, message } => {
            match serde_json::from_str::<ErrorResponse>(&message) {
                Ok(body) => format!("HTTP {status}: {}", body.error.message),
                Err(_) => format!("HTTP {status}: {message}"),
            }
        }
        other => other.to_string(),
    }
}

#[async_trait(?Send)]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, image: &ImageData) -> Result<UploadedImage, MediaError> {
        let form = self.upload_form(image, Utc::now().timestamp());
        let response = self
            .client
            .post("/image/upload")
            .form(&form)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| MediaError::Upload(api_error(e)))?;

        let body: UploadResponse = response.json()?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| MediaError::Upload("response without url".into()))?;
        Ok(UploadedImage {
            url,
            public_id: body.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let form = self.destroy_form(public_id, Utc::now().timestamp());
        let response = self
            .client
            .post("/image/destroy")
            .form(&form)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| MediaError::Destroy(api_error(e)))?;

        let body: DestroyResponse = response.json()?;
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::Destroy(format!("{public_id}: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(preset: Option<&str>, folder: Option<&str>) -> CloudinaryHost {
        CloudinaryHost::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "shh".into(),
            upload_preset: preset.map(str::to_string),
            folder: folder.map(str::to_string),
        })
    }

    fn field<'a>(form: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_sign_sorted_params() {
        let params = BTreeMap::from([
            ("upload_preset", "geek_preset".to_string()),
            ("timestamp", "1700000000".to_string()),
            ("folder", "alura-geek".to_string()),
        ]);
        assert_eq!(
            sign(&params, "shh"),
            "dacffefc581f197301c09b31d3f2033aa83fb195b9a7e6ac739ea40892d97a22"
        );
    }

    #[test]
    fn test_upload_form() {
        let image = ImageData::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        let form = host(Some("geek_preset"), Some("alura-geek")).upload_form(&image, 1_700_000_000);

        assert_eq!(form[0].0, "file");
        assert_eq!(field(&form, "api_key"), Some("1234"));
        assert_eq!(field(&form, "timestamp"), Some("1700000000"));
        assert_eq!(field(&form, "signature_algorithm"), Some("sha256"));
        assert_eq!(
            field(&form, "signature"),
            Some("dacffefc581f197301c09b31d3f2033aa83fb195b9a7e6ac739ea40892d97a22")
        );
    }

    #[test]
    fn test_upload_form_without_preset() {
        let image = ImageData::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        let form = host(None, None).upload_form(&image, 1);
        assert_eq!(field(&form, "upload_preset"), None);
        assert_eq!(field(&form, "folder"), None);
    }

    #[test]
    fn test_destroy_form() {
        let form = host(None, None).destroy_form("alura-geek/abc", 1_700_000_000);
        assert_eq!(field(&form, "public_id"), Some("alura-geek/abc"));
        assert_eq!(
            field(&form, "signature"),
            Some("ad30a127ba514217e335fa01cd89bb80f7a66c380a31c4eb6b8490ba6679f0e9")
        );
    }

    #[test]
    fn test_api_error_message() {
        let err = FetchError::HttpError {
            status: 401,
            message: r#"{"error":{"message":"Invalid Signature"}}"#.into(),
        };
        assert_eq!(api_error(err), "HTTP 401: Invalid Signature");

        let err = FetchError::HttpError {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(api_error(err), "HTTP 502: Bad Gateway");
    }
}
