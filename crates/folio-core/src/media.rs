//! Media uploads
//!
//! Two upload paths, each behind its own configuration predicate:
//!
//! - resume files go to Supabase object storage and come back as a
//!   public URL under `/storage/v1/object/public/...`
//! - project images go to Cloudinary via unsigned upload and come back
//!   as the returned `secure_url`
//!
//! Both reject oversized files before any network call.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::now_millis;

/// Uploads can be slow on large files; give them more room than reads
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Upload client for resume files and project images
pub struct MediaClient {
    client: reqwest::Client,
    config: Config,
}

impl MediaClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            config: config.clone(),
        }
    }

    pub fn is_resume_storage_configured(&self) -> bool {
        self.config.is_resume_storage_configured()
    }

    pub fn is_image_hosting_configured(&self) -> bool {
        self.config.is_image_hosting_configured()
    }

    /// Upload a resume file, returning its public URL
    pub async fn upload_resume(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<String> {
        if bytes.is_empty() {
            return Err(Error::Validation("No resume file provided.".to_string()));
        }
        if !self.is_resume_storage_configured() {
            return Err(Error::NotConfigured(
                "Supabase resume storage is not configured.".to_string(),
            ));
        }
        self.check_size(bytes.len())?;

        let base_url = self.config.base_url().unwrap_or_default();
        let api_key = self
            .config
            .supabase_key
            .clone()
            .unwrap_or_default()
            .trim()
            .to_string();

        let safe_name = sanitize_file_name(file_name, "Resume.pdf");
        let object_path = if self.config.resume_folder.trim().is_empty() {
            unique_object_name(&safe_name)
        } else {
            format!(
                "{}/{}",
                self.config.resume_folder.trim(),
                unique_object_name(&safe_name)
            )
        };

        let upload_url = format!(
            "{}/storage/v1/object/{}/{}",
            base_url,
            encode_path(&self.config.resume_bucket),
            encode_path(&object_path)
        );

        let response = self
            .client
            .post(&upload_url)
            .header("apikey", &api_key)
            .bearer_auth(&api_key)
            .header(
                "Content-Type",
                content_type.unwrap_or("application/pdf"),
            )
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .or_else(|| body.get("error").and_then(|v| v.as_str()))
                .unwrap_or("Supabase upload failed.")
                .to_string();
            return Err(Error::Remote(message));
        }

        let public_url = format!(
            "{}/storage/v1/object/public/{}/{}",
            base_url,
            encode_path(&self.config.resume_bucket),
            encode_path(&object_path)
        );
        info!(object = %object_path, "resume uploaded");
        Ok(public_url)
    }

    /// Upload a project image, returning the hosted secure URL
    pub async fn upload_image(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        if bytes.is_empty() {
            return Err(Error::Validation("No file provided.".to_string()));
        }
        if !self.is_image_hosting_configured() {
            return Err(Error::NotConfigured(
                "Cloudinary is not configured. Set FOLIO_CLOUDINARY_CLOUD_NAME and \
                 FOLIO_CLOUDINARY_UPLOAD_PRESET."
                    .to_string(),
            ));
        }
        self.check_size(bytes.len())?;

        let cloud_name = self
            .config
            .cloudinary_cloud_name
            .clone()
            .unwrap_or_default();
        let preset = self
            .config
            .cloudinary_upload_preset
            .clone()
            .unwrap_or_default();
        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            cloud_name.trim()
        );

        let safe_name = sanitize_file_name(file_name, "image");
        let mut form = Form::new()
            .part("file", Part::bytes(bytes).file_name(safe_name))
            .text("upload_preset", preset.trim().to_string());
        let folder = self.config.cloudinary_folder.trim();
        if !folder.is_empty() {
            form = form.text("folder", folder.to_string());
        }

        let response = self.client.post(&endpoint).multipart(form).send().await?;

        let status = response.status();
        let body = match response.json::<serde_json::Value>().await {
            Ok(body) => body,
            Err(_) => {
                return Err(Error::Remote("Cloudinary upload failed.".to_string()));
            }
        };

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|v| v.as_str())
                .unwrap_or("Cloudinary upload failed.")
                .to_string();
            return Err(Error::Remote(message));
        }

        match body.get("secure_url").and_then(|v| v.as_str()) {
            Some(url) => {
                info!(url, "image uploaded");
                Ok(url.to_string())
            }
            None => Err(Error::Remote(
                "Cloudinary did not return a secure image URL.".to_string(),
            )),
        }
    }

    fn check_size(&self, len: usize) -> Result<()> {
        let limit = self.config.max_upload_bytes;
        if len as u64 > limit {
            return Err(Error::Validation(format!(
                "File is too large. Maximum size is {} MB.",
                limit / (1024 * 1024)
            )));
        }
        Ok(())
    }
}

/// Whitespace collapses to dashes, everything outside `[A-Za-z0-9._-]`
/// is stripped; an empty result falls back to the given name
pub fn sanitize_file_name(file_name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_was_space = false;
    for c in file_name.trim().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push('-');
            }
            last_was_space = true;
        } else {
            last_was_space = false;
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                result.push(c);
            }
        }
    }
    if result.is_empty() {
        fallback.to_string()
    } else {
        result
    }
}

/// Timestamp + random suffix + safe name, so repeat uploads never collide
fn unique_object_name(safe_name: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", now_millis(), &suffix[..6], safe_name)
}

/// Percent-encode each path segment, keeping the separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_segment(segment: &str) -> String {
    let mut encoded = String::new();
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(config: Config) -> MediaClient {
        MediaClient::new(&config)
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(
            sanitize_file_name("My Resume 2026.pdf", "Resume.pdf"),
            "My-Resume-2026.pdf"
        );
        assert_eq!(
            sanitize_file_name("rés umé!.pdf", "Resume.pdf"),
            "rs-um.pdf"
        );
        assert_eq!(sanitize_file_name("  ", "Resume.pdf"), "Resume.pdf");
        assert_eq!(sanitize_file_name("", "image"), "image");
    }

    #[test]
    fn test_unique_object_name_never_collides() {
        let a = unique_object_name("cv.pdf");
        let b = unique_object_name("cv.pdf");
        assert_ne!(a, b);
        assert!(a.ends_with("-cv.pdf"));
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("portfolio/cv.pdf"), "portfolio/cv.pdf");
        assert_eq!(encode_path("a b/c"), "a%20b/c");
        assert_eq!(encode_path("//double//slash"), "double/slash");
    }

    #[tokio::test]
    async fn test_upload_resume_rejects_empty_file() {
        let client = media(Config::default());
        let err = client
            .upload_resume(Vec::new(), "cv.pdf", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No resume file provided.");
    }

    #[tokio::test]
    async fn test_upload_resume_requires_configuration() {
        let client = media(Config::default());
        let err = client
            .upload_resume(vec![1, 2, 3], "cv.pdf", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_upload_image_requires_configuration() {
        let client = media(Config::default());
        let err = client.upload_image(vec![1], "shot.png").await.unwrap_err();
        assert!(matches!(err, Error::NotConfigured(_)));
        assert!(err.to_string().contains("FOLIO_CLOUDINARY_CLOUD_NAME"));
    }

    #[tokio::test]
    async fn test_size_limit_rejects_before_any_network_call() {
        let config = Config {
            supabase_url: Some("https://proj.supabase.co".to_string()),
            supabase_key: Some("anon".to_string()),
            max_upload_bytes: 4,
            ..Config::default()
        };
        let client = media(config);

        let err = client
            .upload_resume(vec![0; 5], "cv.pdf", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("too large"));
    }
}
