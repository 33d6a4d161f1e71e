//! Resume service
//!
//! The resume is a singleton record rather than a collection: one public
//! URL plus a download file name. Local mode keeps it in `resume.json`;
//! remote mode keeps it as a single fixed-id row in the resume table so
//! the same upsert semantics apply.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::auth::AdminAuth;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::Resume;
use crate::notify::{ChangeNotifier, Topic, Watch, WatchEvent};
use crate::store::local::atomic_write;

/// Fixed id of the singleton row in remote mode
const RESUME_ROW_ID: &str = "resume";

/// Row shape of the remote resume table
#[derive(Debug, Serialize, Deserialize)]
struct ResumeRow {
    id: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    file_name: String,
}

enum ResumeBackend {
    Local {
        path: PathBuf,
    },
    Remote {
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        table: String,
    },
}

/// Read/update access to the resume singleton
pub struct ResumeService {
    backend: Arc<ResumeBackend>,
    auth: Arc<AdminAuth>,
    notifier: ChangeNotifier,
    poll_interval: Duration,
}

impl ResumeService {
    pub fn new(config: &Config, auth: Arc<AdminAuth>, notifier: ChangeNotifier) -> Self {
        let backend = if config.is_remote_configured() {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .expect("failed to build HTTP client");
            ResumeBackend::Remote {
                client,
                base_url: config.base_url().unwrap_or_default(),
                api_key: config
                    .supabase_key
                    .clone()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                table: config.table_for("resume").to_string(),
            }
        } else {
            ResumeBackend::Local {
                path: config.collection_path("resume"),
            }
        };

        Self {
            backend: Arc::new(backend),
            auth,
            notifier,
            poll_interval: config.poll_interval(),
        }
    }

    /// Read the resume; missing or corrupt state reads as the default
    pub async fn read(&self) -> Result<Resume> {
        read_backend(&self.backend).await
    }

    /// Replace the resume record
    pub async fn update(&self, mut resume: Resume) -> Result<Resume> {
        self.auth.require()?;
        resume.validate()?;
        resume.normalize();

        match self.backend.as_ref() {
            ResumeBackend::Local { path } => {
                let json = serde_json::to_string_pretty(&resume)?;
                atomic_write(path, json.as_bytes())?;
            }
            ResumeBackend::Remote {
                client,
                base_url,
                api_key,
                table,
            } => {
                let row = ResumeRow {
                    id: RESUME_ROW_ID.to_string(),
                    url: resume.url.clone(),
                    file_name: resume.file_name.clone(),
                };
                let response = client
                    .post(format!("{}/rest/v1/{}", base_url, table))
                    .header("apikey", api_key)
                    .bearer_auth(api_key)
                    .query(&[("on_conflict", "id")])
                    .header("Prefer", "resolution=merge-duplicates")
                    .json(&[row])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let message = match response.json::<serde_json::Value>().await {
                        Ok(body) => body
                            .get("message")
                            .and_then(|v| v.as_str())
                            .or_else(|| body.get("error").and_then(|v| v.as_str()))
                            .unwrap_or("Could not update resume right now.")
                            .to_string(),
                        Err(_) => "Could not update resume right now.".to_string(),
                    };
                    return Err(Error::Remote(message));
                }
            }
        }

        info!(file_name = %resume.file_name, "resume updated");
        self.notifier.publish(Topic::Resume);
        Ok(resume)
    }

    /// Subscribe to resume changes; same contract as collection watches
    pub fn watch(&self) -> Watch<Resume> {
        let backend = Arc::clone(&self.backend);
        let mut changes = self.notifier.subscribe();
        let poll_interval = self.poll_interval;
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut last_token = change_token(&backend);
            if send_snapshot(&backend, &tx).await.is_err() {
                return;
            }

            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    change = changes.recv() => {
                        match change {
                            Ok(change) if change.topic == Topic::Resume => {
                                last_token = change_token(&backend);
                                if send_snapshot(&backend, &tx).await.is_err() {
                                    break;
                                }
                            }
                            Ok(_) => {}
                            Err(broadcast::error::RecvError::Lagged(_)) => {
                                if send_snapshot(&backend, &tx).await.is_err() {
                                    break;
                                }
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                    _ = ticker.tick() => {
                        match backend.as_ref() {
                            ResumeBackend::Remote { .. } => {
                                if send_snapshot(&backend, &tx).await.is_err() {
                                    break;
                                }
                            }
                            ResumeBackend::Local { .. } => {
                                let token = change_token(&backend);
                                if token != last_token {
                                    last_token = token;
                                    if send_snapshot(&backend, &tx).await.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        });

        Watch::new(rx, task)
    }
}

async fn read_backend(backend: &ResumeBackend) -> Result<Resume> {
    match backend {
        ResumeBackend::Local { path } => {
            if !path.exists() {
                return Ok(Resume::default());
            }
            let raw = fs::read_to_string(path).map_err(|e| Error::ReadError {
                path: path.clone(),
                source: e,
            })?;
            match serde_json::from_str::<Resume>(&raw) {
                Ok(mut resume) => {
                    resume.normalize();
                    Ok(resume)
                }
                Err(e) => {
                    warn!(error = %e, "corrupt resume file, using default");
                    Ok(Resume::default())
                }
            }
        }
        ResumeBackend::Remote {
            client,
            base_url,
            api_key,
            table,
        } => {
            let id_filter = format!("eq.{}", RESUME_ROW_ID);
            let response = client
                .get(format!("{}/rest/v1/{}", base_url, table))
                .header("apikey", api_key)
                .bearer_auth(api_key)
                .query(&[("select", "*"), ("id", id_filter.as_str())])
                .send()
                .await?;

            if !response.status().is_success() {
                let message = match response.json::<serde_json::Value>().await {
                    Ok(body) => body
                        .get("message")
                        .and_then(|v| v.as_str())
                        .or_else(|| body.get("error").and_then(|v| v.as_str()))
                        .unwrap_or("Could not load resume right now.")
                        .to_string(),
                    Err(_) => "Could not load resume right now.".to_string(),
                };
                return Err(Error::Remote(message));
            }

            let rows: Vec<ResumeRow> = response.json().await.unwrap_or_default();
            let mut resume = rows
                .into_iter()
                .next()
                .map(|row| Resume::new(row.url, row.file_name))
                .unwrap_or_default();
            resume.normalize();
            Ok(resume)
        }
    }
}

async fn send_snapshot(
    backend: &Arc<ResumeBackend>,
    tx: &mpsc::UnboundedSender<WatchEvent<Resume>>,
) -> std::result::Result<(), ()> {
    let event = match read_backend(backend).await {
        Ok(resume) => WatchEvent::Updated(resume),
        Err(e) => WatchEvent::Error(e.to_string()),
    };
    tx.send(event).map_err(|_| ())
}

fn change_token(backend: &ResumeBackend) -> Option<SystemTime> {
    match backend {
        ResumeBackend::Local { path } => fs::metadata(path).and_then(|m| m.modified()).ok(),
        ResumeBackend::Remote { .. } => None,
    }
}
