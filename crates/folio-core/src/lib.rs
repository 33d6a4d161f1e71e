//! Folio Core Library
//!
//! This crate provides the content layer for folio, a personal portfolio
//! whose collections (projects, experience skills, qualification
//! timeline, resume) persist either to local JSON files or to a Supabase
//! REST backend, selected by configuration.
//!
//! # Architecture
//!
//! - **Stores**: one contract, two backends; remote is chosen when an
//!   endpoint URL and API key are configured, local otherwise
//! - **Change notifier**: a typed publish/subscribe bus; every mutation
//!   broadcasts, every view subscription re-reads
//! - **Services**: one generic CRUD service parameterized per collection,
//!   plus a resume singleton; all mutations gate on the admin session
//!
//! Consistency is eventual and last-writer-wins: concurrent edits from
//! two sessions race without version checks. The admin gate is a UX
//! affordance, not access control.
//!
//! # Quick Start
//!
//! ```text
//! let portfolio = Portfolio::open()?;
//!
//! portfolio.auth().login("admin@example.com", "hunter2")?;
//! portfolio.projects().add(Project::new("Weather Dashboard")).await?;
//!
//! let projects = portfolio.projects().read().await?;
//! ```
//!
//! # Modules
//!
//! - `portfolio`: application context (main entry point)
//! - `models`: record types and normalization
//! - `collection`: the generic CRUD + reorder service
//! - `resume`: the singleton resume service
//! - `store`: local and remote persistence
//! - `notify`: change notification and view subscriptions
//! - `auth`: the admin gate (not a security boundary)
//! - `media`: resume and image uploads
//! - `config`: application configuration

pub mod auth;
pub mod collection;
pub mod config;
pub mod defaults;
pub mod error;
pub mod media;
pub mod models;
pub mod notify;
pub mod portfolio;
pub mod resume;
pub mod store;

pub use auth::{AdminAuth, AuthState};
pub use collection::CollectionService;
pub use config::Config;
pub use error::{Error, Result};
pub use media::MediaClient;
pub use models::{
    ExperienceItem, Project, QualificationCategory, QualificationItem, Resume, SkillCategory,
    SkillLevel,
};
pub use notify::{Change, ChangeNotifier, Topic, Watch, WatchEvent};
pub use portfolio::Portfolio;
pub use resume::ResumeService;
pub use store::{CollectionStore, Record};
