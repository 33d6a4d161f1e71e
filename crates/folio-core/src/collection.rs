//! Generic collection service
//!
//! One parameterized CRUD service covers every list collection
//! (projects, experience, qualification); the per-type differences
//! (naming, validation, insert placement, seed data) live on the
//! [`Record`] trait. Every mutation follows the same pipeline: auth gate,
//! validate, normalize, persist, notify.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::auth::AdminAuth;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::notify::{ChangeNotifier, Watch, WatchEvent};
use crate::store::{open_store, CollectionStore, Record};

/// CRUD + reorder over one entity collection
pub struct CollectionService<R: Record> {
    store: Arc<dyn CollectionStore<R>>,
    auth: Arc<AdminAuth>,
    notifier: ChangeNotifier,
    poll_interval: std::time::Duration,
}

impl<R: Record> CollectionService<R> {
    pub fn new(config: &Config, auth: Arc<AdminAuth>, notifier: ChangeNotifier) -> Self {
        Self {
            store: open_store(config),
            auth,
            notifier,
            poll_interval: config.poll_interval(),
        }
    }

    /// Read the full collection in display order
    pub async fn read(&self) -> Result<Vec<R>> {
        self.store.read().await
    }

    /// Look up a single record by id
    pub async fn get(&self, id: &str) -> Result<Option<R>> {
        let records = self.read().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    /// Add a new record
    ///
    /// Projects insert at the front of the grid; categorized items append.
    /// The input's id and position are always replaced with fresh values.
    pub async fn add(&self, mut record: R) -> Result<R> {
        self.auth.require()?;
        record.validate()?;

        let current = self.store.read().await?;
        record.prepare_insert(&current);
        record.normalize();

        let stored = self.store.insert(&record).await?;
        info!(collection = R::COLLECTION, id = stored.id(), "record added");
        self.notifier.publish(R::TOPIC);
        Ok(stored)
    }

    /// Update an existing record, identified by its id
    ///
    /// Identity fields (id, creation time, position) are carried over from
    /// the stored record regardless of what the input claims.
    pub async fn update(&self, mut record: R) -> Result<R> {
        self.auth.require()?;

        let current = self.store.read().await?;
        let existing = current
            .iter()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| Error::NotFound(R::NOT_FOUND_MESSAGE.to_string()))?;

        record.preserve_from(existing);
        record.validate()?;
        record.normalize();

        let stored = self.store.update(&record).await?;
        info!(collection = R::COLLECTION, id = stored.id(), "record updated");
        self.notifier.publish(R::TOPIC);
        Ok(stored)
    }

    /// Remove a record by id; removing an absent id is a no-op
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.auth.require()?;

        self.store.remove(id).await?;
        info!(collection = R::COLLECTION, id, "record removed");
        self.notifier.publish(R::TOPIC);
        Ok(())
    }

    /// Move one record to another's position
    ///
    /// The source is spliced out and re-inserted where the target sits,
    /// then every record's sort order is rewritten to its index, leaving a
    /// contiguous 0..n-1 sequence. The whole collection is persisted.
    pub async fn reorder(&self, source_id: &str, target_id: &str) -> Result<Vec<R>> {
        self.auth.require()?;

        if source_id.is_empty() || target_id.is_empty() || source_id == target_id {
            return self.read().await;
        }

        let mut records = self.store.read().await?;
        let source_index = records.iter().position(|r| r.id() == source_id);
        let target_index = records.iter().position(|r| r.id() == target_id);

        let (Some(source_index), Some(target_index)) = (source_index, target_index) else {
            return Err(Error::NotFound(format!(
                "Could not reorder {}.",
                R::COLLECTION
            )));
        };

        let moved = records.remove(source_index);
        records.insert(target_index.min(records.len()), moved);

        for (index, record) in records.iter_mut().enumerate() {
            record.set_sort_order(index as i64);
        }

        self.store.write(&records).await?;
        info!(
            collection = R::COLLECTION,
            source = source_id,
            target = target_id,
            "collection reordered"
        );
        self.notifier.publish(R::TOPIC);
        Ok(records)
    }

    /// Subscribe to this collection
    ///
    /// Delivers an immediate snapshot, then a fresh one after every
    /// mutation. Remote stores additionally re-fetch on the poll interval
    /// to catch edits from other sessions; local stores re-read when the
    /// backing file changes on disk. Dropping the watch stops the task.
    pub fn watch(&self) -> Watch<Vec<R>> {
        let store = Arc::clone(&self.store);
        let mut changes = self.notifier.subscribe();
        let poll_interval = self.poll_interval;
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut last_token = store.change_token();
            if send_snapshot(&store, &tx).await.is_err() {
                return;
            }

            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial snapshot
            // already went out, so consume it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    change = changes.recv() => {
                        match change {
                            Ok(change) if change.topic == R::TOPIC => {
                                last_token = store.change_token();
                                if send_snapshot(&store, &tx).await.is_err() {
                                    break;
                                }
                            }
                            Ok(_) => {}
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                debug!(collection = R::COLLECTION, skipped, "watch lagged");
                                if send_snapshot(&store, &tx).await.is_err() {
                                    break;
                                }
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                    _ = ticker.tick() => {
                        if store.is_remote() {
                            if send_snapshot(&store, &tx).await.is_err() {
                                break;
                            }
                        } else {
                            let token = store.change_token();
                            if token != last_token {
                                last_token = token;
                                if send_snapshot(&store, &tx).await.is_err() {
                                    break;
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

/// Read and deliver one snapshot; `Err` means the subscriber is gone
async fn send_snapshot<R: Record>(
    store: &Arc<dyn CollectionStore<R>>,
    tx: &mpsc::UnboundedSender<WatchEvent<Vec<R>>>,
) -> std::result::Result<(), ()> {
    let event = match store.read().await {
        Ok(records) => WatchEvent::Updated(records),
        Err(e) => WatchEvent::Error(e.to_string()),
    };
    tx.send(event).map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::models::{Project, SkillCategory, SkillLevel};
    use crate::models::ExperienceItem;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            admin_email: Some("admin@example.com".to_string()),
            admin_password_hash: Some(hash_password("hunter2")),
            ..Config::default()
        }
    }

    fn service<R: Record>(config: &Config, logged_in: bool) -> CollectionService<R> {
        let notifier = ChangeNotifier::new();
        let auth = Arc::new(AdminAuth::new(config, notifier.clone()));
        if logged_in {
            auth.login("admin@example.com", "hunter2").unwrap();
        } else {
            auth.logout().unwrap();
        }
        CollectionService::new(config, auth, notifier)
    }

    #[tokio::test]
    async fn test_read_seeds_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), false);

        let records = projects.read().await.unwrap();
        assert_eq!(records.len(), crate::defaults::projects().len());
    }

    #[tokio::test]
    async fn test_add_requires_auth_and_leaves_collection_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), false);

        let before = projects.read().await.unwrap();
        let err = projects.add(Project::new("Intruder")).await.unwrap_err();

        assert!(matches!(err, Error::Unauthorized));
        assert_eq!(projects.read().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_add_validates_before_touching_the_store() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let before = projects.read().await.unwrap();
        let err = projects.add(Project::new("   ")).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "Project title is required.");
        assert_eq!(projects.read().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_add_puts_project_at_front() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let before = projects.read().await.unwrap();
        let stored = projects.add(Project::new("Shiny New Thing")).await.unwrap();

        let after = projects.read().await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0].id, stored.id);
        assert_eq!(after[0].title, "Shiny New Thing");
    }

    #[tokio::test]
    async fn test_add_appends_experience_item() {
        let temp_dir = TempDir::new().unwrap();
        let skills: CollectionService<ExperienceItem> = service(&test_config(&temp_dir), true);

        let stored = skills
            .add(ExperienceItem::new(
                "Rust",
                SkillLevel::Proficient,
                SkillCategory::Backend,
            ))
            .await
            .unwrap();

        let after = skills.read().await.unwrap();
        assert_eq!(after.last().unwrap().id, stored.id);
    }

    #[tokio::test]
    async fn test_add_ignores_caller_supplied_id() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let mut input = Project::new("Spoofed");
        input.id = "project-1".to_string();
        let stored = projects.add(input).await.unwrap();

        assert_ne!(stored.id, "project-1");
    }

    #[tokio::test]
    async fn test_update_preserves_identity_fields() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let stored = projects.add(Project::new("Original")).await.unwrap();

        let mut edit = stored.clone();
        edit.title = "Renamed".to_string();
        edit.created_at = 1;
        edit.sort_order = 99;
        let updated = projects.update(edit).await.unwrap();

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.sort_order, stored.sort_order);
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);
        projects.read().await.unwrap();

        let mut ghost = Project::new("Ghost");
        ghost.id = "missing".to_string();
        let err = projects.update(ghost).await.unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.to_string(), "Project not found.");
    }

    #[tokio::test]
    async fn test_remove_and_silent_remove_of_missing() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let stored = projects.add(Project::new("Doomed")).await.unwrap();
        let count = projects.read().await.unwrap().len();

        projects.remove(&stored.id).await.unwrap();
        assert_eq!(projects.read().await.unwrap().len(), count - 1);

        // Absent ids filter silently
        projects.remove("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_reorder_rewrites_contiguous_sort_orders() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let records = projects.read().await.unwrap();
        let source = records.last().unwrap().id.clone();
        let target = records[0].id.clone();

        let reordered = projects.reorder(&source, &target).await.unwrap();

        // The moved record now sits at the target's position
        assert_eq!(reordered[0].id, source);
        // And sort orders are a contiguous 0..n-1 sequence
        for (index, record) in reordered.iter().enumerate() {
            assert_eq!(record.sort_order, index as i64);
        }

        // The rewrite persisted
        let after = projects.read().await.unwrap();
        assert_eq!(after[0].id, source);
    }

    #[tokio::test]
    async fn test_reorder_same_id_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let before = projects.read().await.unwrap();
        let id = before[0].id.clone();
        let result = projects.reorder(&id, &id).await.unwrap();
        assert_eq!(result, before);
    }

    #[tokio::test]
    async fn test_reorder_unknown_id_errors() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let records = projects.read().await.unwrap();
        let err = projects
            .reorder(&records[0].id, "nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Could not reorder projects.");
    }

    #[tokio::test]
    async fn test_reorder_requires_auth() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), false);

        let err = projects.reorder("a", "b").await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
    }

    #[tokio::test]
    async fn test_watch_delivers_initial_snapshot_then_updates() {
        let temp_dir = TempDir::new().unwrap();
        let projects: CollectionService<Project> = service(&test_config(&temp_dir), true);

        let mut watch = projects.watch();

        let first = tokio::time::timeout(Duration::from_secs(5), watch.next())
            .await
            .unwrap()
            .unwrap();
        let initial_len = match first {
            WatchEvent::Updated(records) => records.len(),
            WatchEvent::Error(message) => panic!("unexpected error: {}", message),
        };

        projects.add(Project::new("Watched")).await.unwrap();

        let second = tokio::time::timeout(Duration::from_secs(5), watch.next())
            .await
            .unwrap()
            .unwrap();
        match second {
            WatchEvent::Updated(records) => {
                assert_eq!(records.len(), initial_len + 1);
                assert_eq!(records[0].title, "Watched");
            }
            WatchEvent::Error(message) => panic!("unexpected error: {}", message),
        }
    }

    #[tokio::test]
    async fn test_watch_ignores_other_topics() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let notifier = ChangeNotifier::new();
        let auth = Arc::new(AdminAuth::new(&config, notifier.clone()));
        auth.login("admin@example.com", "hunter2").unwrap();

        let projects: CollectionService<Project> =
            CollectionService::new(&config, Arc::clone(&auth), notifier.clone());
        let skills: CollectionService<ExperienceItem> =
            CollectionService::new(&config, auth, notifier);

        let mut watch = projects.watch();
        // Drain the initial snapshot
        tokio::time::timeout(Duration::from_secs(5), watch.next())
            .await
            .unwrap()
            .unwrap();

        skills
            .add(ExperienceItem::new(
                "Go",
                SkillLevel::Basic,
                SkillCategory::Backend,
            ))
            .await
            .unwrap();

        // No project change happened, so nothing arrives promptly
        let outcome =
            tokio::time::timeout(Duration::from_millis(200), watch.next()).await;
        assert!(outcome.is_err());
    }
}
