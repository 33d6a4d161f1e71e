//! Collection persistence
//!
//! One store contract, two implementations:
//!
//! - [`local::LocalStore`] - a JSON file per collection under the data
//!   directory, seeded with defaults on first read
//! - [`remote::RemoteStore`] - REST calls against the configured endpoint
//!
//! The backend is selected by configuration: remote when an endpoint URL
//! and API key are both present, local otherwise.

pub mod local;
pub mod remote;

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::models::{ExperienceItem, Project, QualificationItem};
use crate::notify::Topic;

/// A record type that lives in an ordered entity collection
///
/// Implementations describe everything the generic store and service
/// need: naming for the local file and remote table, seed data for first
/// run, normalization and validation rules, and placement on insert.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name: local file stem and default remote table suffix
    const COLLECTION: &'static str;

    /// Notifier topic broadcast after mutations
    const TOPIC: Topic;

    /// Message for failed id lookups
    const NOT_FOUND_MESSAGE: &'static str;

    /// Singular noun used in user-facing remote error fallbacks
    const DISPLAY_SINGULAR: &'static str;

    /// Whether remote reads add `created_at.desc` as an order tie-break
    const ORDERS_BY_CREATED_AT: bool = false;

    fn id(&self) -> &str;
    fn sort_order(&self) -> i64;
    fn set_sort_order(&mut self, order: i64);

    /// Creation-time tie-break for ordering; zero when untracked
    fn created_at(&self) -> i64 {
        0
    }

    fn normalize(&mut self);
    fn validate(&self) -> Result<()>;

    /// Assign a fresh identity and position among `current` records
    fn prepare_insert(&mut self, current: &[Self]);

    /// Carry over the fields a mutation may not change
    fn preserve_from(&mut self, existing: &Self);

    /// Seed collection for an empty local store
    fn seed() -> Vec<Self>;

    /// What a corrupt local file falls back to
    fn corrupt_fallback() -> Vec<Self> {
        Vec::new()
    }
}

/// Persistence contract for one entity collection
#[async_trait]
pub trait CollectionStore<R: Record>: Send + Sync {
    /// Read the full collection, normalized and in display order
    async fn read(&self) -> Result<Vec<R>>;

    /// Persist the full collection (bulk upsert in remote mode)
    async fn write(&self, records: &[R]) -> Result<()>;

    /// Persist a single new record
    async fn insert(&self, record: &R) -> Result<R>;

    /// Persist changes to a single existing record
    async fn update(&self, record: &R) -> Result<R>;

    /// Remove a record by id; absent ids are a silent no-op
    async fn remove(&self, id: &str) -> Result<()>;

    /// Whether edits from other sessions can appear out-of-band
    fn is_remote(&self) -> bool;

    /// Token that changes when the backing data may have changed outside
    /// this process; `None` when the backend cannot tell
    fn change_token(&self) -> Option<SystemTime>;
}

/// Open the store selected by the configuration
pub fn open_store<R: Record>(config: &Config) -> Arc<dyn CollectionStore<R>> {
    if config.is_remote_configured() {
        Arc::new(remote::RemoteStore::new(config))
    } else {
        Arc::new(local::LocalStore::new(config))
    }
}

/// Sort into display order: `sort_order` ascending, newest-first within
/// ties, original order otherwise (the sort is stable)
pub fn sort_records<R: Record>(records: &mut [R]) {
    records.sort_by_key(|record| (record.sort_order(), Reverse(record.created_at())));
}

// ==================== Record impls ====================

impl Record for Project {
    const COLLECTION: &'static str = "projects";
    const TOPIC: Topic = Topic::Projects;
    const NOT_FOUND_MESSAGE: &'static str = "Project not found.";
    const DISPLAY_SINGULAR: &'static str = "project";
    const ORDERS_BY_CREATED_AT: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn set_sort_order(&mut self, order: i64) {
        self.sort_order = order;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn normalize(&mut self) {
        Project::normalize(self);
    }

    fn validate(&self) -> Result<()> {
        Project::validate(self)
    }

    /// New projects go to the front of the grid
    fn prepare_insert(&mut self, current: &[Self]) {
        self.id = crate::models::fresh_id();
        self.created_at = crate::models::now_millis();
        self.sort_order = current
            .iter()
            .map(|p| p.sort_order)
            .min()
            .map(|min| min - 1)
            .unwrap_or(0);
    }

    fn preserve_from(&mut self, existing: &Self) {
        self.id = existing.id.clone();
        self.created_at = existing.created_at;
        self.sort_order = existing.sort_order;
    }

    fn seed() -> Vec<Self> {
        crate::defaults::projects()
    }
}

impl Record for ExperienceItem {
    const COLLECTION: &'static str = "experience";
    const TOPIC: Topic = Topic::Experience;
    const NOT_FOUND_MESSAGE: &'static str = "Experience item not found.";
    const DISPLAY_SINGULAR: &'static str = "experience item";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn set_sort_order(&mut self, order: i64) {
        self.sort_order = order;
    }

    fn normalize(&mut self) {
        ExperienceItem::normalize(self);
    }

    fn validate(&self) -> Result<()> {
        ExperienceItem::validate(self)
    }

    /// New skills append after everything else
    fn prepare_insert(&mut self, current: &[Self]) {
        self.id = crate::models::fresh_id();
        self.sort_order = current
            .iter()
            .map(|item| item.sort_order)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0);
    }

    fn preserve_from(&mut self, existing: &Self) {
        self.id = existing.id.clone();
        self.sort_order = existing.sort_order;
    }

    fn seed() -> Vec<Self> {
        crate::defaults::experience()
    }

    fn corrupt_fallback() -> Vec<Self> {
        Self::seed()
    }
}

impl Record for QualificationItem {
    const COLLECTION: &'static str = "qualification";
    const TOPIC: Topic = Topic::Qualification;
    const NOT_FOUND_MESSAGE: &'static str = "Qualification item not found.";
    const DISPLAY_SINGULAR: &'static str = "qualification item";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn set_sort_order(&mut self, order: i64) {
        self.sort_order = order;
    }

    fn normalize(&mut self) {
        QualificationItem::normalize(self);
    }

    fn validate(&self) -> Result<()> {
        QualificationItem::validate(self)
    }

    fn prepare_insert(&mut self, current: &[Self]) {
        self.id = crate::models::fresh_id();
        self.sort_order = current
            .iter()
            .map(|item| item.sort_order)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0);
    }

    fn preserve_from(&mut self, existing: &Self) {
        self.id = existing.id.clone();
        self.sort_order = existing.sort_order;
    }

    fn seed() -> Vec<Self> {
        crate::defaults::qualification()
    }

    fn corrupt_fallback() -> Vec<Self> {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SkillCategory, SkillLevel};

    #[test]
    fn test_sort_records_orders_by_sort_order() {
        let mut records = vec![
            ExperienceItem {
                sort_order: 2,
                ..ExperienceItem::new("B", SkillLevel::Basic, SkillCategory::Frontend)
            },
            ExperienceItem {
                sort_order: 0,
                ..ExperienceItem::new("A", SkillLevel::Basic, SkillCategory::Frontend)
            },
            ExperienceItem {
                sort_order: 1,
                ..ExperienceItem::new("C", SkillLevel::Basic, SkillCategory::Frontend)
            },
        ];
        sort_records(&mut records);

        let skills: Vec<_> = records.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(skills, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_sort_ties_break_newest_first_for_projects() {
        let mut older = Project::new("Older");
        older.created_at = 100;
        older.sort_order = 0;
        let mut newer = Project::new("Newer");
        newer.created_at = 200;
        newer.sort_order = 0;

        let mut records = vec![older, newer];
        sort_records(&mut records);
        assert_eq!(records[0].title, "Newer");
    }

    #[test]
    fn test_project_prepare_insert_goes_to_front() {
        let current = crate::defaults::projects();
        let mut project = Project::new("Fresh");
        project.prepare_insert(&current);

        let min = current.iter().map(|p| p.sort_order).min().unwrap();
        assert_eq!(project.sort_order, min - 1);
    }

    #[test]
    fn test_project_prepare_insert_on_empty_collection() {
        let mut project = Project::new("First");
        project.prepare_insert(&[]);
        assert_eq!(project.sort_order, 0);
    }

    #[test]
    fn test_experience_prepare_insert_appends() {
        let current = crate::defaults::experience();
        let mut item = ExperienceItem::new("Rust", SkillLevel::Proficient, SkillCategory::Backend);
        item.prepare_insert(&current);

        let max = current.iter().map(|i| i.sort_order).max().unwrap();
        assert_eq!(item.sort_order, max + 1);
    }

    #[test]
    fn test_preserve_from_keeps_identity() {
        let mut existing = Project::new("Existing");
        existing.sort_order = 7;
        let created = existing.created_at;

        let mut updated = Project::new("Updated");
        updated.preserve_from(&existing);

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.sort_order, 7);
        assert_eq!(updated.title, "Updated");
    }
}
