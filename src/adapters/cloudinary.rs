use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::toml_config::MediaConfig;
use crate::domain::model::{ImageUpload, UploadedImage};
use crate::domain::ports::MediaHost;
use crate::utils::error::{PortfolioError, Result};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
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

/// Signed calls against the Cloudinary upload API.
#[derive(Debug, Clone)]
pub struct CloudinaryMediaHost {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

impl CloudinaryMediaHost {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1_1/{}/image/{}", self.base_url, self.cloud_name, action)
    }

    /// SHA-256 over the parameters sorted by name, joined as `k=v&k=v`, with
    /// the API secret appended.
    pub fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => format!("{} ({})", body.error.message, status),
            Err(_) => format!("unexpected response status {}", status),
        }
    }
}

fn media_error(e: reqwest::Error) -> PortfolioError {
    PortfolioError::MediaHostError {
        message: e.to_string(),
    }
}

#[async_trait]
impl MediaHost for CloudinaryMediaHost {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("folder", self.folder.as_str()),
            ("timestamp", timestamp.as_str()),
        ]);

        let mut file = Part::bytes(image.bytes).file_name(image.file_name.clone());
        if let Some(content_type) = &image.content_type {
            file = file.mime_str(content_type)?;
        }

        let form = Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("signature", signature)
            .part("file", file);

        tracing::debug!("Uploading {} to media host", image.file_name);
        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(media_error)?;

        if !response.status().is_success() {
            return Err(PortfolioError::MediaHostError {
                message: Self::error_message(response).await,
            });
        }

        let body: UploadResponse = response.json().await.map_err(media_error)?;
        tracing::debug!("Uploaded image as {}", body.public_id);
        Ok(UploadedImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature =
            self.sign(&[("public_id", public_id), ("timestamp", timestamp.as_str())]);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .map_err(media_error)?;

        if !response.status().is_success() {
            return Err(PortfolioError::MediaHostError {
                message: Self::error_message(response).await,
            });
        }

        let body: DestroyResponse = response.json().await.map_err(media_error)?;
        match body.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                tracing::warn!("Image {} was already missing on the media host", public_id);
                Ok(())
            }
            other => Err(PortfolioError::MediaHostError {
                message: format!("destroy of {} returned `{}`", public_id, other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::{default_image_formats, default_media_folder};
    use httpmock::prelude::*;
    use serde_json::json;

    fn media_config(base_url: String) -> MediaConfig {
        MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "abcd".to_string(),
            folder: default_media_folder(),
            base_url,
            allowed_formats: default_image_formats(),
        }
    }

    fn png() -> ImageUpload {
        ImageUpload {
            file_name: "cover.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: b"fake image bytes".to_vec(),
        }
    }

    #[test]
    fn test_signature_sorts_parameters() {
        let host = CloudinaryMediaHost::new(&media_config("https://api.cloudinary.com".into()));

        let a = host.sign(&[("timestamp", "1315060510"), ("public_id", "sample")]);
        let b = host.sign(&[("public_id", "sample"), ("timestamp", "1315060510")]);
        assert_eq!(a, b);

        let mut hasher = Sha256::new();
        hasher.update(b"public_id=sample&timestamp=1315060510abcd");
        assert_eq!(a, hex::encode(hasher.finalize()));
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url_and_public_id() {
        let server = MockServer::start_async().await;
        let upload_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1_1/demo/image/upload")
                    .body_contains("portfolio_projects")
                    .body_contains("cover.png");
                then.status(200).json_body(json!({
                    "public_id": "portfolio_projects/abc123",
                    "secure_url": "https://res.cloudinary.com/demo/image/upload/abc123.png"
                }));
            })
            .await;

        let host = CloudinaryMediaHost::new(&media_config(server.base_url()));
        let uploaded = host.upload(png()).await.unwrap();

        upload_mock.assert_async().await;
        assert_eq!(uploaded.public_id, "portfolio_projects/abc123");
        assert!(uploaded.url.starts_with("https://res.cloudinary.com/"));
    }

    #[tokio::test]
    async fn test_upload_error_is_media_host_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo/image/upload");
                then.status(401)
                    .json_body(json!({ "error": { "message": "Invalid Signature" } }));
            })
            .await;

        let host = CloudinaryMediaHost::new(&media_config(server.base_url()));
        let err = host.upload(png()).await.unwrap_err();

        match err {
            PortfolioError::MediaHostError { message } => {
                assert!(message.contains("Invalid Signature"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_destroy_sends_public_id() {
        let server = MockServer::start_async().await;
        let destroy_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1_1/demo/image/destroy")
                    .x_www_form_urlencoded_tuple("public_id", "portfolio_projects/abc123")
                    .x_www_form_urlencoded_tuple("api_key", "1234");
                then.status(200).json_body(json!({ "result": "ok" }));
            })
            .await;

        let host = CloudinaryMediaHost::new(&media_config(server.base_url()));
        host.destroy("portfolio_projects/abc123").await.unwrap();

        destroy_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_destroy_tolerates_missing_asset() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo/image/destroy");
                then.status(200).json_body(json!({ "result": "not found" }));
            })
            .await;

        let host = CloudinaryMediaHost::new(&media_config(server.base_url()));
        assert!(host.destroy("gone").await.is_ok());
    }
}
