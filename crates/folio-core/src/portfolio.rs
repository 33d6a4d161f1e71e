//! Application context
//!
//! `Portfolio` owns everything with lifecycle: configuration, the change
//! notifier, the auth gate and the per-collection services. Construct one
//! at startup and pass it by reference; there is no ambient module state,
//! so two contexts (say, production and a test fixture) coexist without
//! touching each other.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::auth::AdminAuth;
use crate::collection::CollectionService;
use crate::config::Config;
use crate::media::MediaClient;
use crate::models::{ExperienceItem, Project, QualificationItem};
use crate::notify::ChangeNotifier;
use crate::resume::ResumeService;

/// The assembled content system
pub struct Portfolio {
    config: Config,
    notifier: ChangeNotifier,
    auth: Arc<AdminAuth>,
    projects: CollectionService<Project>,
    experience: CollectionService<ExperienceItem>,
    qualification: CollectionService<QualificationItem>,
    resume: ResumeService,
    media: MediaClient,
}

impl Portfolio {
    /// Open with configuration from the default location and environment
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        config
            .ensure_data_dir()
            .context("Failed to create data directory")?;

        let notifier = ChangeNotifier::new();
        let auth = Arc::new(AdminAuth::new(&config, notifier.clone()));

        let projects = CollectionService::new(&config, Arc::clone(&auth), notifier.clone());
        let experience = CollectionService::new(&config, Arc::clone(&auth), notifier.clone());
        let qualification = CollectionService::new(&config, Arc::clone(&auth), notifier.clone());
        let resume = ResumeService::new(&config, Arc::clone(&auth), notifier.clone());
        let media = MediaClient::new(&config);

        Ok(Self {
            config,
            notifier,
            auth,
            projects,
            experience,
            qualification,
            resume,
            media,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether collections persist remotely or to local files
    pub fn is_remote(&self) -> bool {
        self.config.is_remote_configured()
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn auth(&self) -> &AdminAuth {
        &self.auth
    }

    pub fn projects(&self) -> &CollectionService<Project> {
        &self.projects
    }

    pub fn experience(&self) -> &CollectionService<ExperienceItem> {
        &self.experience
    }

    pub fn qualification(&self) -> &CollectionService<QualificationItem> {
        &self.qualification
    }

    pub fn resume(&self) -> &ResumeService {
        &self.resume
    }

    pub fn media(&self) -> &MediaClient {
        &self.media
    }
}
