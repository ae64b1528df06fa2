//! Collections and timer markers on top of a [`KeyValueStore`]

use super::{
    KeyValueStore, ACTIVE_TIMER_KEY, CLIENTS_KEY, PROJECTS_KEY, TIMER_DATA_KEY, TIME_ENTRIES_KEY,
};
use crate::{
    models::{Client, Project, TimeEntry, TimerMarker},
    Error, Result,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Everything read back from storage at launch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub entries: Vec<TimeEntry>,
    pub active_timer: Option<(i64, TimerMarker)>,
}

#[derive(Clone)]
pub struct DaybookStorage {
    store: Arc<dyn KeyValueStore>,
}

impl DaybookStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read all five keys. Missing keys load as empty.
    pub fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            clients: self.read(CLIENTS_KEY)?.unwrap_or_default(),
            projects: self.read(PROJECTS_KEY)?.unwrap_or_default(),
            entries: self.read(TIME_ENTRIES_KEY)?.unwrap_or_default(),
            active_timer: self.load_active_timer()?,
        })
    }

    /// Both markers must be present for a timer to be recoverable.
    pub fn load_active_timer(&self) -> Result<Option<(i64, TimerMarker)>> {
        let project_id: Option<i64> = self.read(ACTIVE_TIMER_KEY)?;
        let marker: Option<TimerMarker> = self.read(TIMER_DATA_KEY)?;
        Ok(project_id.zip(marker))
    }

    /// Write the three collections independently. Every write is attempted;
    /// the first failure is returned.
    pub fn save(
        &self,
        clients: &[Client],
        projects: &[Project],
        entries: &[TimeEntry],
    ) -> Result<()> {
        let results = [
            self.write(CLIENTS_KEY, clients),
            self.write(PROJECTS_KEY, projects),
            self.write(TIME_ENTRIES_KEY, entries),
        ];
        results.into_iter().collect()
    }

    /// Write or clear the restart markers.
    pub fn persist_active_timer(&self, active: Option<(i64, &TimerMarker)>) -> Result<()> {
        match active {
            Some((project_id, marker)) => {
                self.write(ACTIVE_TIMER_KEY, &project_id)?;
                self.write(TIMER_DATA_KEY, marker)
            }
            None => {
                let results = [
                    self.remove(ACTIVE_TIMER_KEY),
                    self.remove(TIMER_DATA_KEY),
                ];
                results.into_iter().collect()
            }
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let load_error = |message: String| Error::Load {
            key: key.to_string(),
            message,
        };

        let Some(content) = self.store.get(key).map_err(|e| load_error(e.to_string()))? else {
            return Ok(None);
        };

        if content.trim().is_empty() || content.trim() == "null" {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| load_error(e.to_string()))
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let save_error = |message: String| Error::Save {
            key: key.to_string(),
            message,
        };

        let content = serde_json::to_string(value).map_err(|e| save_error(e.to_string()))?;
        self.store
            .set(key, &content)
            .map_err(|e| save_error(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key).map_err(|e| Error::Save {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryStatus;
    use crate::storage::{FileStore, MemoryStore};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample() -> (Vec<Client>, Vec<Project>, Vec<TimeEntry>) {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clients = vec![Client::new(1, "Acme", created).unwrap()];
        let projects = vec![Project::new(2, "Website", 1, 50.0, created).unwrap()];
        let entries = vec![
            TimeEntry::new(3, 2, 125, created, EntryStatus::Completed),
            TimeEntry::new(4, 2, 60, created, EntryStatus::Paused),
        ];
        (clients, projects, entries)
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let storage = DaybookStorage::new(Arc::new(MemoryStore::new()));
        assert_eq!(storage.load().unwrap(), Snapshot::default());
    }

    #[test]
    fn test_collections_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let storage = DaybookStorage::new(store.clone());
        let (clients, projects, entries) = sample();

        storage.save(&clients, &projects, &entries).unwrap();
        assert_eq!(store.len(), 3);

        let snapshot = storage.load().unwrap();
        assert_eq!(snapshot.clients, clients);
        assert_eq!(snapshot.projects, projects);
        assert_eq!(snapshot.entries, entries);
        assert!(snapshot.active_timer.is_none());
    }

    #[test]
    fn test_round_trip_through_files() {
        let temp_dir = TempDir::new().unwrap();
        let storage = DaybookStorage::new(Arc::new(FileStore::new(temp_dir.path().to_path_buf())));
        let (clients, projects, entries) = sample();

        storage.save(&clients, &projects, &entries).unwrap();
        assert!(temp_dir.path().join("timeEntries.json").exists());

        let reopened = DaybookStorage::new(Arc::new(FileStore::new(temp_dir.path().to_path_buf())));
        let snapshot = reopened.load().unwrap();
        assert_eq!(snapshot.entries, entries);
    }

    #[test]
    fn test_active_timer_markers() {
        let store = Arc::new(MemoryStore::new());
        let storage = DaybookStorage::new(store.clone());
        let marker = TimerMarker {
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            initial_elapsed: 30,
        };

        storage.persist_active_timer(Some((2, &marker))).unwrap();
        assert_eq!(store.get(ACTIVE_TIMER_KEY).unwrap(), Some("2".to_string()));
        assert_eq!(storage.load().unwrap().active_timer, Some((2, marker)));

        storage.persist_active_timer(None).unwrap();
        assert!(store.is_empty());
        assert_eq!(storage.load_active_timer().unwrap(), None);
    }

    #[test]
    fn test_half_written_marker_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(ACTIVE_TIMER_KEY, "2").unwrap();
        let storage = DaybookStorage::new(store);
        assert_eq!(storage.load_active_timer().unwrap(), None);
    }

    #[test]
    fn test_corrupt_blob_reports_load_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(PROJECTS_KEY, "{not json").unwrap();
        let storage = DaybookStorage::new(store);

        match storage.load() {
            Err(Error::Load { key, .. }) => assert_eq!(key, PROJECTS_KEY),
            other => panic!("Expected load error, got {:?}", other),
        }
    }
}
