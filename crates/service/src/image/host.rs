use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::domain::ImageRef;

pub const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("image host request failed: {0}")]
    Request(String),
    #[error("image host rejected deletion: {0}")]
    Rejected(String),
}

/// External store holding the uploaded assets.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError>;
}

/// Best-effort deletion: failures are logged and counted, never returned.
pub async fn release(host: &dyn ImageHost, image: &ImageRef) {
    if image.public_id.trim().is_empty() {
        return;
    }
    match host.destroy(&image.public_id).await {
        Ok(()) => {
            debug!(public_id = %image.public_id, "image_released");
            common::metrics::IMAGE_RELEASES_TOTAL.with_label_values(&["ok"]).inc();
        }
        Err(e) => {
            warn!(public_id = %image.public_id, error = %e, "image_release_failed");
            common::metrics::IMAGE_RELEASES_TOTAL.with_label_values(&["error"]).inc();
        }
    }
}

/// Cloudinary destroy API client using signed requests.
pub struct CloudinaryHost {
    client: reqwest::Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryHost {
    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> Result<Self, ImageHostError> {
        Self::with_base_url(CLOUDINARY_API_BASE, cloud_name, api_key, api_secret)
    }

    pub fn with_base_url(base_url: &str, cloud_name: &str, api_key: &str, api_secret: &str) -> Result<Self, ImageHostError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ImageHostError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }

    fn destroy_url(&self) -> String {
        format!("{}/v1_1/{}/image/destroy", self.base_url, self.cloud_name)
    }
}

/// Cloudinary request signature: parameters sorted by name, joined as a query
/// string, suffixed with the API secret and hashed.
pub fn sign(public_id: &str, timestamp: i64, api_secret: &str) -> String {
    let payload = format!("public_id={public_id}&timestamp={timestamp}{api_secret}");
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(public_id, timestamp, &self.api_secret);
        let timestamp = timestamp.to_string();
        let form = [
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];
        let resp = self
            .client
            .post(self.destroy_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| ImageHostError::Request(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ImageHostError::Rejected(format!("{status}: {body}")));
        }
        let body: DestroyResponse = resp.json().await.map_err(|e| ImageHostError::Request(e.to_string()))?;
        match body.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                debug!(public_id, "image already absent on host");
                Ok(())
            }
            other => Err(ImageHostError::Rejected(other.to_string())),
        }
    }
}

/// Used when no Cloudinary credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopImageHost;

#[async_trait]
impl ImageHost for NoopImageHost {
    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
        info!(public_id, "image host disabled; skipping delete");
        Ok(())
    }
}

/// Recording host for tests.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingImageHost {
        destroyed: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingImageHost {
        pub fn failing() -> Self {
            Self { destroyed: Mutex::new(Vec::new()), fail: true }
        }

        pub fn destroyed(&self) -> Vec<String> {
            self.destroyed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageHost for RecordingImageHost {
        async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
            self.destroyed.lock().unwrap().push(public_id.to_string());
            if self.fail {
                return Err(ImageHostError::Request("connection refused".into()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn signature_depends_on_secret_and_timestamp() {
        let a = sign("volta/a", 1_700_000_000, "secret-one");
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, sign("volta/a", 1_700_000_000, "secret-one"));
        assert_ne!(a, sign("volta/a", 1_700_000_000, "secret-two"));
        assert_ne!(a, sign("volta/a", 1_700_000_001, "secret-one"));
    }

    #[tokio::test]
    async fn cloudinary_destroy_posts_signed_form() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1_1/demo/image/destroy")
                    .body_contains("public_id=volta%2Fa")
                    .body_contains("api_key=key123")
                    .body_contains("signature_algorithm=sha256");
                then.status(200).json_body(serde_json::json!({ "result": "ok" }));
            })
            .await;
        let host = CloudinaryHost::with_base_url(&server.base_url(), "demo", "key123", "shh").unwrap();
        host.destroy("volta/a").await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn cloudinary_error_result_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1_1/demo/image/destroy");
                then.status(200).json_body(serde_json::json!({ "result": "error" }));
            })
            .await;
        let host = CloudinaryHost::with_base_url(&server.base_url(), "demo", "key123", "shh").unwrap();
        let err = host.destroy("volta/a").await.unwrap_err();
        assert!(matches!(err, ImageHostError::Rejected(_)));
    }

    #[tokio::test]
    async fn release_swallows_host_failures() {
        let host = mock::RecordingImageHost::failing();
        let img = ImageRef { url: "u".into(), path: "p".into(), public_id: "volta/x".into() };
        release(&host, &img).await;
        assert_eq!(host.destroyed(), vec!["volta/x".to_string()]);
    }
}
