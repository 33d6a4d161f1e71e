//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/folio/config.toml)
//! 3. Environment variables (FOLIO_* prefix)
//!
//! Environment variables take precedence over config file values.
//! When no remote endpoint is configured the stores silently fall back
//! to local JSON persistence under `data_dir`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "FOLIO";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (collection files, session, credentials)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Remote endpoint base URL (optional; absence selects local storage)
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// API key sent as both `apikey` and bearer token
    #[serde(default)]
    pub supabase_key: Option<String>,

    /// Remote table names, one per collection
    #[serde(default = "default_projects_table")]
    pub projects_table: String,
    #[serde(default = "default_experience_table")]
    pub experience_table: String,
    #[serde(default = "default_qualification_table")]
    pub qualification_table: String,
    #[serde(default = "default_resume_table")]
    pub resume_table: String,

    /// Object-storage bucket/folder for resume uploads
    #[serde(default = "default_resume_bucket")]
    pub resume_bucket: String,
    #[serde(default = "default_resume_folder")]
    pub resume_folder: String,

    /// Image hosting (Cloudinary unsigned uploads)
    #[serde(default)]
    pub cloudinary_cloud_name: Option<String>,
    #[serde(default)]
    pub cloudinary_upload_preset: Option<String>,
    #[serde(default = "default_cloudinary_folder")]
    pub cloudinary_folder: String,

    /// Remote refresh interval for subscriptions, in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Upload size ceiling, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Admin credentials (email + SHA-256 password hash)
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub admin_password_hash: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            supabase_url: None,
            supabase_key: None,
            projects_table: default_projects_table(),
            experience_table: default_experience_table(),
            qualification_table: default_qualification_table(),
            resume_table: default_resume_table(),
            resume_bucket: default_resume_bucket(),
            resume_folder: default_resume_folder(),
            cloudinary_cloud_name: None,
            cloudinary_upload_preset: None,
            cloudinary_folder: default_cloudinary_folder(),
            poll_interval_secs: default_poll_interval_secs(),
            max_upload_bytes: default_max_upload_bytes(),
            admin_email: None,
            admin_password_hash: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (FOLIO_DATA_DIR, FOLIO_SUPABASE_URL, ...)
    /// 2. Config file (~/.config/folio/config.toml or FOLIO_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env("DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }
        override_optional(&mut self.supabase_url, "SUPABASE_URL");
        override_optional(&mut self.supabase_key, "SUPABASE_KEY");
        override_string(&mut self.projects_table, "PROJECTS_TABLE");
        override_string(&mut self.experience_table, "EXPERIENCE_TABLE");
        override_string(&mut self.qualification_table, "QUALIFICATION_TABLE");
        override_string(&mut self.resume_table, "RESUME_TABLE");
        override_string(&mut self.resume_bucket, "RESUME_BUCKET");
        override_string(&mut self.resume_folder, "RESUME_FOLDER");
        override_optional(&mut self.cloudinary_cloud_name, "CLOUDINARY_CLOUD_NAME");
        override_optional(&mut self.cloudinary_upload_preset, "CLOUDINARY_UPLOAD_PRESET");
        override_string(&mut self.cloudinary_folder, "CLOUDINARY_FOLDER");
        override_optional(&mut self.admin_email, "ADMIN_EMAIL");
        override_optional(&mut self.admin_password_hash, "ADMIN_PASSWORD_HASH");

        if let Ok(val) = env("POLL_INTERVAL_SECS") {
            if let Ok(parsed) = val.parse() {
                self.poll_interval_secs = parsed;
            }
        }
        if let Ok(val) = env("MAX_UPLOAD_BYTES") {
            if let Ok(parsed) = val.parse() {
                self.max_upload_bytes = parsed;
            }
        }
    }

    /// Ensure data directory exists
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with FOLIO_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = env("CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("folio")
            .join("config.toml")
    }

    /// Remote base URL with any trailing slash removed
    pub fn base_url(&self) -> Option<String> {
        self.supabase_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
    }

    /// Whether collections persist to the remote endpoint
    pub fn is_remote_configured(&self) -> bool {
        self.base_url().is_some()
            && self
                .supabase_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }

    /// Whether resume files can be uploaded to object storage
    pub fn is_resume_storage_configured(&self) -> bool {
        self.is_remote_configured() && !self.resume_bucket.trim().is_empty()
    }

    /// Whether project images can be uploaded to the image host
    pub fn is_image_hosting_configured(&self) -> bool {
        self.cloudinary_cloud_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
            && self
                .cloudinary_upload_preset
                .as_deref()
                .is_some_and(|preset| !preset.trim().is_empty())
    }

    /// Remote table name for a collection
    pub fn table_for<'a>(&'a self, collection: &'a str) -> &'a str {
        match collection {
            "projects" => &self.projects_table,
            "experience" => &self.experience_table,
            "qualification" => &self.qualification_table,
            "resume" => &self.resume_table,
            _ => collection,
        }
    }

    /// Path of the local JSON file backing a collection
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection))
    }

    /// Path of the admin session file
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Path of the locally stored admin credentials file
    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join("credentials.json")
    }

    /// Subscription refresh interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

fn env(name: &str) -> std::result::Result<String, std::env::VarError> {
    std::env::var(format!("{}_{}", ENV_PREFIX, name))
}

/// Empty-string values clear the option, mirroring unset
fn override_optional(field: &mut Option<String>, name: &str) {
    if let Ok(val) = env(name) {
        *field = if val.is_empty() { None } else { Some(val) };
    }
}

fn override_string(field: &mut String, name: &str) {
    if let Ok(val) = env(name) {
        if !val.is_empty() {
            *field = val;
        }
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

fn default_projects_table() -> String {
    "portfolio_projects".to_string()
}

fn default_experience_table() -> String {
    "portfolio_experience".to_string()
}

fn default_qualification_table() -> String {
    "portfolio_qualification".to_string()
}

fn default_resume_table() -> String {
    "portfolio_resume".to_string()
}

fn default_resume_bucket() -> String {
    "resumes".to_string()
}

fn default_resume_folder() -> String {
    "portfolio".to_string()
}

fn default_cloudinary_folder() -> String {
    "portfolio-projects".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}
