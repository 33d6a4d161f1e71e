//! Admin authentication
//!
//! This is NOT a security boundary. Credentials live in configuration or
//! in a world-readable file, the session is a flag on disk, and nothing
//! is verified server-side. The gate exists so the CLI and any UI built
//! on the library can distinguish "admin mode" from casual browsing; a
//! real deployment must enforce access control behind a server it owns.
//!
//! Credential resolution order: configuration (email + SHA-256 password
//! hash) first, then the credentials file under the data directory.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::now_millis;
use crate::notify::{ChangeNotifier, Topic};

/// Where the active credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Config,
    File,
}

/// Resolved admin credentials
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password_hash: String,
    pub source: CredentialSource,
}

/// On-disk credential file shape
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredentials {
    email: String,
    password_hash: String,
}

/// On-disk session file shape
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    email: String,
    logged_in_at: i64,
}

/// Snapshot of the auth state for display
#[derive(Debug, Clone, Serialize)]
pub struct AuthState {
    pub is_configured: bool,
    pub is_authenticated: bool,
    pub email: String,
}

/// Admin auth gate
pub struct AdminAuth {
    credentials_path: PathBuf,
    session_path: PathBuf,
    config_email: Option<String>,
    config_password_hash: Option<String>,
    notifier: ChangeNotifier,
}

impl AdminAuth {
    pub fn new(config: &Config, notifier: ChangeNotifier) -> Self {
        Self {
            credentials_path: config.credentials_path(),
            session_path: config.session_path(),
            config_email: config.admin_email.clone(),
            config_password_hash: config.admin_password_hash.clone(),
            notifier,
        }
    }

    /// Resolve the active credentials, config first
    pub fn active_credentials(&self) -> Option<AdminCredentials> {
        if let (Some(email), Some(hash)) = (&self.config_email, &self.config_password_hash) {
            let email = normalize_email(email);
            let hash = hash.trim().to_string();
            if !email.is_empty() && !hash.is_empty() {
                return Some(AdminCredentials {
                    email,
                    password_hash: hash,
                    source: CredentialSource::Config,
                });
            }
        }

        let raw = fs::read_to_string(&self.credentials_path).ok()?;
        let stored: StoredCredentials = serde_json::from_str(&raw).ok()?;
        let email = normalize_email(&stored.email);
        if email.is_empty() || stored.password_hash.is_empty() {
            return None;
        }
        Some(AdminCredentials {
            email,
            password_hash: stored.password_hash,
            source: CredentialSource::File,
        })
    }

    /// Whether any admin credentials exist
    pub fn is_configured(&self) -> bool {
        self.active_credentials().is_some()
    }

    /// Whether an admin session matching the credentials is active
    pub fn is_authenticated(&self) -> bool {
        let Some(credentials) = self.active_credentials() else {
            return false;
        };
        match self.read_session() {
            Some(session) => normalize_email(&session.email) == credentials.email,
            None => false,
        }
    }

    /// Fail fast unless a mutation is allowed
    pub fn require(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    /// Current state for status displays
    pub fn state(&self) -> AuthState {
        let is_authenticated = self.is_authenticated();
        let email = if is_authenticated {
            self.read_session()
                .map(|s| normalize_email(&s.email))
                .unwrap_or_default()
        } else {
            String::new()
        };
        AuthState {
            is_configured: self.is_configured(),
            is_authenticated,
            email,
        }
    }

    /// Verify credentials and start a session
    ///
    /// The stored hash is compared against the SHA-256 of the input; a
    /// stored value that is not 64 hex chars is treated as a plain-text
    /// password and compared directly.
    pub fn login(&self, email: &str, password: &str) -> Result<()> {
        let credentials = self
            .active_credentials()
            .ok_or(Error::AdminNotConfigured)?;

        let normalized_email = normalize_email(email);
        let input_hash = hash_password(password);

        let password_matches = if is_sha256_hex(&credentials.password_hash) {
            input_hash == credentials.password_hash.to_lowercase()
        } else {
            password == credentials.password_hash
        };

        if normalized_email != credentials.email || !password_matches {
            return Err(Error::InvalidCredentials);
        }

        let session = StoredSession {
            email: credentials.email.clone(),
            logged_in_at: now_millis(),
        };
        self.write_json(&self.session_path, &session)?;
        info!(email = %credentials.email, "admin logged in");
        self.notifier.publish(Topic::Auth);
        Ok(())
    }

    /// End the session; logging out while logged out is fine
    pub fn logout(&self) -> Result<()> {
        if self.session_path.exists() {
            fs::remove_file(&self.session_path)
                .map_err(|e| Error::from_io(e, self.session_path.clone()))?;
        }
        info!("admin logged out");
        self.notifier.publish(Topic::Auth);
        Ok(())
    }

    /// Store credentials in the data directory (hashing the password)
    ///
    /// Config-sourced credentials always win over the file; callers should
    /// surface that when both exist.
    pub fn set_credentials(&self, email: &str, password: &str) -> Result<()> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(Error::Validation("Email is required.".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("Password is required.".to_string()));
        }

        let stored = StoredCredentials {
            email,
            password_hash: hash_password(password),
        };
        self.write_json(&self.credentials_path, &stored)?;
        self.notifier.publish(Topic::Auth);
        Ok(())
    }

    fn read_session(&self) -> Option<StoredSession> {
        let raw = fs::read_to_string(&self.session_path).ok()?;
        let session: StoredSession = serde_json::from_str(&raw).ok()?;
        if session.email.trim().is_empty() {
            return None;
        }
        Some(session)
    }

    fn write_json<T: Serialize>(&self, path: &PathBuf, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::from_io(e, parent.to_path_buf()))?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json).map_err(|e| Error::from_io(e, path.clone()))?;
        Ok(())
    }
}

/// Lowercased, trimmed email form used for all comparisons
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// SHA-256 of the password as lowercase hex
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Whether a stored credential value looks like a SHA-256 hex digest
fn is_sha256_hex(value: &str) -> bool {
    let value = value.trim();
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_auth(temp_dir: &TempDir) -> AdminAuth {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        AdminAuth::new(&config, ChangeNotifier::new())
    }

    fn configured_auth(temp_dir: &TempDir) -> AdminAuth {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            admin_email: Some("Admin@Example.com".to_string()),
            admin_password_hash: Some(hash_password("hunter2")),
            ..Config::default()
        };
        AdminAuth::new(&config, ChangeNotifier::new())
    }

    #[test]
    fn test_hash_password_is_sha256_hex() {
        let hash = hash_password("hunter2");
        assert_eq!(hash.len(), 64);
        assert!(is_sha256_hex(&hash));
        // Known digest for an empty string
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_unconfigured_login_fails() {
        let temp_dir = TempDir::new().unwrap();
        let auth = test_auth(&temp_dir);

        assert!(!auth.is_configured());
        let err = auth.login("a@b.c", "pw").unwrap_err();
        assert!(matches!(err, Error::AdminNotConfigured));
    }

    #[test]
    fn test_login_logout_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let auth = configured_auth(&temp_dir);

        assert!(auth.is_configured());
        assert!(!auth.is_authenticated());

        // Email comparison is case-insensitive
        auth.login("admin@example.COM", "hunter2").unwrap();
        assert!(auth.is_authenticated());

        let state = auth.state();
        assert!(state.is_authenticated);
        assert_eq!(state.email, "admin@example.com");

        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
        // Logging out twice is harmless
        auth.logout().unwrap();
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let temp_dir = TempDir::new().unwrap();
        let auth = configured_auth(&temp_dir);

        let err = auth.login("admin@example.com", "wrong").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_login_rejects_wrong_email() {
        let temp_dir = TempDir::new().unwrap();
        let auth = configured_auth(&temp_dir);

        let err = auth.login("someone@else.com", "hunter2").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[test]
    fn test_plain_text_hash_falls_back_to_direct_compare() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            admin_email: Some("admin@example.com".to_string()),
            // Not a 64-hex digest, so compared as plain text
            admin_password_hash: Some("plain-password".to_string()),
            ..Config::default()
        };
        let auth = AdminAuth::new(&config, ChangeNotifier::new());

        auth.login("admin@example.com", "plain-password").unwrap();
        assert!(auth.is_authenticated());
    }

    #[test]
    fn test_file_credentials_used_when_config_absent() {
        let temp_dir = TempDir::new().unwrap();
        let auth = test_auth(&temp_dir);

        auth.set_credentials("Stored@Example.com", "s3cret").unwrap();
        let credentials = auth.active_credentials().unwrap();
        assert_eq!(credentials.email, "stored@example.com");
        assert_eq!(credentials.source, CredentialSource::File);

        auth.login("stored@example.com", "s3cret").unwrap();
        assert!(auth.is_authenticated());
    }

    #[test]
    fn test_config_credentials_win_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let auth = configured_auth(&temp_dir);

        auth.set_credentials("file@example.com", "other").unwrap();
        let credentials = auth.active_credentials().unwrap();
        assert_eq!(credentials.source, CredentialSource::Config);
        assert_eq!(credentials.email, "admin@example.com");
    }

    #[test]
    fn test_set_credentials_validates_input() {
        let temp_dir = TempDir::new().unwrap();
        let auth = test_auth(&temp_dir);

        assert!(matches!(
            auth.set_credentials("  ", "pw"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            auth.set_credentials("a@b.c", ""),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_require_gates_unauthenticated_callers() {
        let temp_dir = TempDir::new().unwrap();
        let auth = configured_auth(&temp_dir);

        assert!(matches!(auth.require(), Err(Error::Unauthorized)));
        auth.login("admin@example.com", "hunter2").unwrap();
        assert!(auth.require().is_ok());
    }

    #[test]
    fn test_session_survives_new_auth_instance() {
        let temp_dir = TempDir::new().unwrap();
        {
            let auth = configured_auth(&temp_dir);
            auth.login("admin@example.com", "hunter2").unwrap();
        }
        let auth = configured_auth(&temp_dir);
        assert!(auth.is_authenticated());
    }

    #[test]
    fn test_corrupt_session_file_reads_as_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let auth = configured_auth(&temp_dir);

        fs::write(temp_dir.path().join("session.json"), "junk").unwrap();
        assert!(!auth.is_authenticated());
    }
}
