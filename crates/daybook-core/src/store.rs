//! In-memory domain collections
//!
//! The [`Store`] owns clients, projects and time entries and enforces the
//! validation and uniqueness rules on insert. Nothing is ever edited or
//! removed once stored.

use crate::{
    models::{project::parse_rate, Client, FinishedTimer, Project, TimeEntry},
    storage::Snapshot,
    Error, Result,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct Store {
    clients: Vec<Client>,
    projects: Vec<Project>,
    entries: Vec<TimeEntry>,
    last_id: i64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::from_parts(
            snapshot.clients.clone(),
            snapshot.projects.clone(),
            snapshot.entries.clone(),
        )
    }

    pub fn from_parts(clients: Vec<Client>, projects: Vec<Project>, entries: Vec<TimeEntry>) -> Self {
        let last_id = clients
            .iter()
            .map(|c| c.id)
            .chain(projects.iter().map(|p| p.id))
            .chain(entries.iter().map(|e| e.id))
            .max()
            .unwrap_or(0);

        Self {
            clients,
            projects,
            entries,
            last_id,
        }
    }

    /// Ids are creation timestamps in milliseconds, bumped past the last
    /// issued id when two records land in the same millisecond.
    fn next_id(&mut self, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    pub fn add_client(&mut self, name: &str, now: DateTime<Utc>) -> Result<&Client> {
        // validate before touching the id counter
        let candidate = Client::new(0, name, now)?;

        if self.clients.iter().any(|c| c.has_name(&candidate.name)) {
            return Err(Error::Duplicate(format!(
                "A client named '{}' already exists",
                candidate.name
            )));
        }

        let client = Client {
            id: self.next_id(now),
            ..candidate
        };
        self.clients.push(client);
        Ok(&self.clients[self.clients.len() - 1])
    }

    pub fn add_project(
        &mut self,
        name: &str,
        client_id: Option<i64>,
        rate_text: &str,
        now: DateTime<Utc>,
    ) -> Result<&Project> {
        let client_id =
            client_id.ok_or_else(|| Error::Validation("Select a client first".to_string()))?;
        if self.client(client_id).is_none() {
            return Err(Error::Validation(format!("Client {} does not exist", client_id)));
        }

        let rate = parse_rate(rate_text)?;
        let candidate = Project::new(0, name, client_id, rate, now)?;

        if self
            .projects
            .iter()
            .any(|p| p.client_id == client_id && p.has_name(&candidate.name))
        {
            return Err(Error::Duplicate(format!(
                "Project '{}' already exists for this client",
                candidate.name
            )));
        }

        let project = Project {
            id: self.next_id(now),
            ..candidate
        };
        self.projects.push(project);
        Ok(&self.projects[self.projects.len() - 1])
    }

    /// Append the entry for a finished timer. Returns `None` when the timer
    /// accrued no time.
    pub fn record_entry(&mut self, finished: &FinishedTimer) -> Option<&TimeEntry> {
        if !finished.has_time() {
            return None;
        }

        let entry = TimeEntry::new(
            self.next_id(finished.finished_at),
            finished.project_id,
            finished.duration,
            finished.finished_at,
            finished.status,
        );
        self.entries.push(entry);
        self.entries.last()
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Entries in insertion order, oldest first.
    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    /// Entries for display, newest first.
    pub fn entries_recent_first(&self) -> impl Iterator<Item = &TimeEntry> {
        self.entries.iter().rev()
    }

    pub fn entries_for_project(&self, project_id: i64) -> impl Iterator<Item = &TimeEntry> {
        self.entries
            .iter()
            .filter(move |e| e.project_id == project_id)
    }

    pub fn client(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn find_client_by_name(&self, name: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.has_name(name))
    }

    pub fn projects_for_client(&self, client_id: i64) -> impl Iterator<Item = &Project> {
        self.projects
            .iter()
            .filter(move |p| p.client_id == client_id)
    }

    /// The project together with its owning client, if both resolve.
    pub fn project_with_client(&self, project_id: i64) -> Option<(&Project, Option<&Client>)> {
        let project = self.project(project_id)?;
        Some((project, self.client(project.client_id)))
    }
}
