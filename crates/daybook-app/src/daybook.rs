//! The single owner of application state
//!
//! [`Daybook`] holds the domain store and the timer engine and is the only
//! thing that mutates them. Every mutation of the collections is followed by
//! a best-effort save; save failures are logged and retried implicitly by
//! the next mutation.

use daybook_core::{
    export::{CsvExporter, ExportTarget, ShareOutcome},
    models::{Client, FinishedTimer, Project, TimeEntry, TimerState},
    report,
    storage::{DaybookStorage, Snapshot},
    Clock, Error, Result, Store,
};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::event_manager::EventManager;
use crate::events::DaybookEvent;
use crate::timer::TimerEngine;

pub struct Daybook {
    store: Store,
    engine: TimerEngine,
    storage: DaybookStorage,
    clock: Arc<dyn Clock>,
    events: Arc<EventManager>,
    exporter: CsvExporter,
    load_error: Option<Error>,
}

impl Daybook {
    /// Load everything from storage and pick up a timer left running by a
    /// previous process. A failed load leaves the book empty; the error is
    /// kept for [`Daybook::load_error`].
    pub async fn open(storage: DaybookStorage, clock: Arc<dyn Clock>) -> Self {
        let events = Arc::new(EventManager::new());
        let engine = TimerEngine::new(clock.clone(), events.clone());

        let loader = storage.clone();
        let loaded = tokio::task::spawn_blocking(move || loader.load())
            .await
            .unwrap_or_else(|e| {
                Err(Error::Load {
                    key: "*".to_string(),
                    message: e.to_string(),
                })
            });

        let (snapshot, load_error) = match loaded {
            Ok(snapshot) => (snapshot, None),
            Err(e) => {
                tracing::warn!("Starting with empty data: {}", e);
                (Snapshot::default(), Some(e))
            }
        };

        let store = Store::from_snapshot(&snapshot);
        tracing::info!(
            "Loaded {} clients, {} projects, {} entries",
            store.clients().len(),
            store.projects().len(),
            store.entries().len()
        );

        let mut daybook = Self {
            store,
            engine,
            storage,
            clock,
            events,
            exporter: CsvExporter::default(),
            load_error,
        };

        if let Some((project_id, marker)) = snapshot.active_timer {
            if daybook.store.project(project_id).is_some() {
                daybook.engine.recover(project_id, &marker);
                tracing::info!(
                    "Recovered timer for project {} at {}s",
                    project_id,
                    daybook.engine.elapsed()
                );
            } else {
                tracing::warn!(
                    "Discarding timer marker for unknown project {}",
                    project_id
                );
                daybook.persist_marker().await;
            }
        }

        daybook
    }

    pub fn with_exporter(mut self, exporter: CsvExporter) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DaybookEvent> {
        self.events.subscribe()
    }

    pub fn load_error(&self) -> Option<&Error> {
        self.load_error.as_ref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn add_client(&mut self, name: &str) -> Result<Client> {
        let client = self.store.add_client(name, self.clock.now())?.clone();
        tracing::info!("Added client '{}' ({})", client.name, client.id);

        self.events.emit(DaybookEvent::ClientAdded {
            client: client.clone(),
        });
        self.persist().await;
        Ok(client)
    }

    pub async fn add_project(
        &mut self,
        name: &str,
        client_id: Option<i64>,
        rate_text: &str,
    ) -> Result<Project> {
        let project = self
            .store
            .add_project(name, client_id, rate_text, self.clock.now())?
            .clone();
        tracing::info!(
            "Added project '{}' ({}) for client {}",
            project.name,
            project.id,
            project.client_id
        );

        self.events.emit(DaybookEvent::ProjectAdded {
            project: project.clone(),
        });
        self.persist().await;
        Ok(project)
    }

    /// Start timing a project. If another project was being timed its entry
    /// is recorded first and returned.
    pub async fn start_timer(&mut self, project_id: i64) -> Result<Option<TimeEntry>> {
        if self.store.project(project_id).is_none() {
            return Err(Error::NotFound(format!("Project {}", project_id)));
        }

        if self.engine.active_project() == Some(project_id) {
            tracing::debug!("Project {} is already being timed", project_id);
            return Ok(None);
        }

        // the previous session is on record before the new timer exists
        let previous = self.engine.stop();
        let entry = self.record(previous).await;

        self.engine.start(project_id);
        tracing::info!("Timer started for project {}", project_id);

        self.persist_marker().await;
        Ok(entry)
    }

    /// Pause the active timer. A no-op when idle.
    pub async fn pause_timer(&mut self) -> Option<TimeEntry> {
        let finished = self.engine.pause()?;
        tracing::info!(
            "Timer paused for project {} after {}s",
            finished.project_id,
            finished.duration
        );

        let entry = self.record(Some(finished)).await;
        self.persist_marker().await;
        entry
    }

    /// Stop the active timer. A no-op when idle.
    pub async fn stop_timer(&mut self) -> Option<TimeEntry> {
        let finished = self.engine.stop()?;
        tracing::info!(
            "Timer stopped for project {} after {}s",
            finished.project_id,
            finished.duration
        );

        let entry = self.record(Some(finished)).await;
        self.persist_marker().await;
        entry
    }

    pub fn tick(&mut self) -> Option<u64> {
        self.engine.tick()
    }

    pub async fn enter_background(&mut self) {
        if self.engine.enter_background() {
            tracing::debug!("Timer suspended at {}s", self.engine.elapsed());
            self.persist_marker().await;
        }
    }

    pub fn enter_foreground(&mut self) -> Option<u64> {
        let caught_up = self.engine.enter_foreground()?;
        tracing::debug!("Caught up {}s spent in the background", caught_up);
        Some(caught_up)
    }

    pub fn timer_state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn elapsed(&self) -> u64 {
        self.engine.elapsed()
    }

    pub fn active_project(&self) -> Option<i64> {
        self.engine.active_project()
    }

    /// Hours logged against a project, one decimal place.
    pub fn total_hours(&self, project_id: i64) -> String {
        report::hours_display(report::total_hours(self.store.entries(), project_id))
    }

    /// Earnings for a project, two decimal places.
    pub fn total_earnings(&self, project_id: i64) -> String {
        report::earnings_display(report::total_earnings(&self.store, project_id))
    }

    pub fn project_with_client(&self, project_id: i64) -> Option<(&Project, Option<&Client>)> {
        self.store.project_with_client(project_id)
    }

    /// Look a client up by id or case-insensitive name.
    pub fn resolve_client(&self, query: &str) -> Result<&Client> {
        if let Ok(id) = query.trim().parse::<i64>() {
            if let Some(client) = self.store.client(id) {
                return Ok(client);
            }
        }

        self.store
            .find_client_by_name(query)
            .ok_or_else(|| Error::NotFound(format!("Client '{}'", query.trim())))
    }

    /// Look a project up by id or name, optionally narrowed to one client.
    pub fn resolve_project(&self, query: &str, client: Option<&str>) -> Result<&Project> {
        if let Ok(id) = query.trim().parse::<i64>() {
            if let Some(project) = self.store.project(id) {
                return Ok(project);
            }
        }

        let client_id = client
            .map(|c| self.resolve_client(c).map(|c| c.id))
            .transpose()?;
        let matches: Vec<&Project> = self
            .store
            .projects()
            .iter()
            .filter(|p| p.has_name(query))
            .filter(|p| client_id.map_or(true, |id| p.client_id == id))
            .collect();

        match matches.as_slice() {
            [project] => Ok(*project),
            [] => Err(Error::NotFound(format!("Project '{}'", query.trim()))),
            _ => Err(Error::Validation(format!(
                "Several clients have a project named '{}'; pick a client",
                query.trim()
            ))),
        }
    }

    pub fn can_export(&self) -> bool {
        !self.store.entries().is_empty()
    }

    /// Export every entry as CSV and hand the file to `target`.
    /// A cancelled share is reported as [`ShareOutcome::Cancelled`], not as
    /// an error.
    pub async fn export_to_csv(&mut self, target: Arc<dyn ExportTarget>) -> Result<ShareOutcome> {
        let artifact = self.exporter.artifact(&self.store, self.clock.now())?;
        let file_name = artifact.file_name.clone();

        let delivered = tokio::task::spawn_blocking(move || target.deliver(&artifact)).await;

        let outcome = match delivered {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(Error::Export(message))) => return Err(Error::Export(message)),
            Ok(Err(e)) => return Err(Error::Export(e.to_string())),
            Err(e) => return Err(Error::Export(e.to_string())),
        };

        match outcome {
            ShareOutcome::Shared(ref location) => {
                tracing::info!("Exported {} entries to {}", self.store.entries().len(), location);
                self.events.emit(DaybookEvent::Exported { file_name });
            }
            ShareOutcome::Cancelled => tracing::info!("Export cancelled"),
        }

        Ok(outcome)
    }

    async fn record(&mut self, finished: Option<FinishedTimer>) -> Option<TimeEntry> {
        let entry = self.store.record_entry(&finished?)?.clone();
        self.events.emit(DaybookEvent::EntryRecorded {
            entry: entry.clone(),
        });
        self.persist().await;
        Some(entry)
    }

    /// Save the three collections. Failures are logged, never returned.
    async fn persist(&self) {
        let storage = self.storage.clone();
        let clients = self.store.clients().to_vec();
        let projects = self.store.projects().to_vec();
        let entries = self.store.entries().to_vec();

        let saved =
            tokio::task::spawn_blocking(move || storage.save(&clients, &projects, &entries)).await;

        match saved {
            Ok(Ok(())) => tracing::debug!("Saved collections"),
            Ok(Err(e)) => tracing::warn!("{}", e),
            Err(e) => tracing::warn!("Save task failed: {}", e),
        }
    }

    async fn persist_marker(&self) {
        let storage = self.storage.clone();
        let marker = self.engine.marker();

        let saved = tokio::task::spawn_blocking(move || {
            storage.persist_active_timer(marker.as_ref().map(|(id, m)| (*id, m)))
        })
        .await;

        match saved {
            Ok(Ok(())) => tracing::debug!("Saved timer marker"),
            Ok(Err(e)) => tracing::warn!("{}", e),
            Err(e) => tracing::warn!("Marker save task failed: {}", e),
        }
    }
}
