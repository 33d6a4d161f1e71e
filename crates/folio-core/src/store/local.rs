//! Local JSON persistence
//!
//! Each collection is one JSON file under the data directory. The first
//! read of a missing file seeds the default collection and persists it.
//! Writes are atomic (temp file + rename) so a crash mid-write never
//! leaves a truncated collection behind. Disk-full conditions surface as
//! a storage-limit error rather than a raw I/O failure.

use std::fs::{self, File};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{sort_records, CollectionStore, Record};
use crate::config::Config;
use crate::error::{Error, Result};

/// File-backed store for one collection
pub struct LocalStore<R: Record> {
    path: PathBuf,
    _marker: PhantomData<R>,
}

impl<R: Record> LocalStore<R> {
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.collection_path(R::COLLECTION),
            _marker: PhantomData,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<R>> {
        if !self.path.exists() {
            let mut seeds = R::seed();
            for record in &mut seeds {
                record.normalize();
            }
            sort_records(&mut seeds);
            self.persist(&seeds)?;
            debug!(
                collection = R::COLLECTION,
                count = seeds.len(),
                "seeded empty collection"
            );
            return Ok(seeds);
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| Error::ReadError {
            path: self.path.clone(),
            source: e,
        })?;

        match serde_json::from_str::<Vec<R>>(&raw) {
            Ok(mut records) => {
                for record in &mut records {
                    record.normalize();
                }
                sort_records(&mut records);
                Ok(records)
            }
            Err(e) => {
                warn!(
                    collection = R::COLLECTION,
                    error = %e,
                    "corrupt collection file, falling back"
                );
                Ok(R::corrupt_fallback())
            }
        }
    }

    fn persist(&self, records: &[R]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        atomic_write(&self.path, json.as_bytes())
    }
}

#[async_trait]
impl<R: Record> CollectionStore<R> for LocalStore<R> {
    async fn read(&self) -> Result<Vec<R>> {
        self.load()
    }

    async fn write(&self, records: &[R]) -> Result<()> {
        let mut normalized: Vec<R> = records.to_vec();
        for record in &mut normalized {
            record.normalize();
        }
        self.persist(&normalized)
    }

    async fn insert(&self, record: &R) -> Result<R> {
        let mut records = self.load()?;
        records.push(record.clone());
        sort_records(&mut records);
        self.persist(&records)?;
        Ok(record.clone())
    }

    async fn update(&self, record: &R) -> Result<R> {
        let mut records = self.load()?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) else {
            return Err(Error::NotFound(R::NOT_FOUND_MESSAGE.to_string()));
        };
        *slot = record.clone();
        self.persist(&records)?;
        Ok(record.clone())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut records = self.load()?;
        records.retain(|r| r.id() != id);
        self.persist(&records)
    }

    fn is_remote(&self) -> bool {
        false
    }

    fn change_token(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::from_io(e, parent.to_path_buf()))?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| Error::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| Error::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| Error::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| Error::from_io(e, path.to_path_buf()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceItem, Project};
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_first_read_seeds_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store: LocalStore<Project> = LocalStore::new(&test_config(&temp_dir));

        assert!(!store.path().exists());

        let records = store.read().await.unwrap();
        assert_eq!(records.len(), crate::defaults::projects().len());
        // Seeding persists, so the file now exists
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store: LocalStore<Project> = LocalStore::new(&test_config(&temp_dir));

        let mut a = Project::new("Alpha");
        a.sort_order = 0;
        let mut b = Project::new("Beta");
        b.sort_order = 1;

        store.write(&[a.clone(), b.clone()]).await.unwrap();
        let records = store.read().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Alpha");
        assert_eq!(records[1].title, "Beta");
        assert_eq!(records[0].id, a.id);
    }

    #[tokio::test]
    async fn test_repeated_write_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store: LocalStore<Project> = LocalStore::new(&test_config(&temp_dir));

        let mut project = Project::new("Stable");
        project.normalize();
        let collection = vec![project];

        store.write(&collection).await.unwrap();
        let first = store.read().await.unwrap();

        store.write(&first).await.unwrap();
        let second = store.read().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_read_returns_display_order() {
        let temp_dir = TempDir::new().unwrap();
        let store: LocalStore<Project> = LocalStore::new(&test_config(&temp_dir));

        let mut last = Project::new("Last");
        last.sort_order = 5;
        let mut first = Project::new("First");
        first.sort_order = -2;

        store.write(&[last, first]).await.unwrap();
        let records = store.read().await.unwrap();

        assert_eq!(records[0].title, "First");
        assert_eq!(records[1].title, "Last");
    }

    #[tokio::test]
    async fn test_insert_and_update_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store: LocalStore<Project> = LocalStore::new(&test_config(&temp_dir));
        store.write(&[]).await.unwrap();

        let mut project = Project::new("Draft");
        project.normalize();
        store.insert(&project).await.unwrap();
        assert_eq!(store.read().await.unwrap().len(), 1);

        project.title = "Final".to_string();
        store.update(&project).await.unwrap();
        assert_eq!(store.read().await.unwrap()[0].title, "Final");

        store.remove(&project.id).await.unwrap();
        assert!(store.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store: LocalStore<Project> = LocalStore::new(&test_config(&temp_dir));
        store.write(&[]).await.unwrap();

        let project = Project::new("Ghost");
        let err = store.update(&project).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.to_string(), "Project not found.");
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let store: LocalStore<Project> = LocalStore::new(&test_config(&temp_dir));
        store.write(&[]).await.unwrap();

        store.remove("no-such-id").await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_projects_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let store: LocalStore<Project> = LocalStore::new(&config);

        fs::write(store.path(), "{not json").unwrap();
        let records = store.read().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_experience_file_reads_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let store: LocalStore<ExperienceItem> = LocalStore::new(&config);

        fs::write(store.path(), "[[[").unwrap();
        let records = store.read().await.unwrap();
        assert_eq!(records.len(), crate::defaults::experience().len());
    }

    #[tokio::test]
    async fn test_change_token_moves_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let store: LocalStore<Project> = LocalStore::new(&test_config(&temp_dir));

        assert!(store.change_token().is_none());
        store.write(&[]).await.unwrap();
        assert!(store.change_token().is_some());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("file.json");

        atomic_write(&nested_path, b"[]").unwrap();

        assert!(nested_path.exists());
        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "[]");
    }
}
