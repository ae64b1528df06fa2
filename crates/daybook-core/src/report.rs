//! Hours and earnings roll-ups
//!
//! Everything here is recomputed from the raw entries on each call.

use crate::{models::TimeEntry, Store};

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub project_id: i64,
    pub project_name: String,
    pub client_name: String,
    pub rate: f64,
    pub total_seconds: u64,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientTotals {
    pub client_id: i64,
    pub client_name: String,
    pub total_seconds: u64,
    pub earnings: f64,
}

pub const UNKNOWN: &str = "Unknown";

pub fn total_seconds(entries: &[TimeEntry], project_id: i64) -> u64 {
    entries
        .iter()
        .filter(|e| e.project_id == project_id)
        .map(|e| e.duration)
        .sum()
}

pub fn total_hours(entries: &[TimeEntry], project_id: i64) -> f64 {
    total_seconds(entries, project_id) as f64 / 3600.0
}

/// Earnings at the project's rate. Zero for unknown or unbilled projects.
pub fn total_earnings(store: &Store, project_id: i64) -> f64 {
    match store.project(project_id) {
        Some(project) if project.rate > 0.0 => {
            earnings(total_seconds(store.entries(), project_id), project.rate)
        }
        _ => 0.0,
    }
}

pub fn earnings(seconds: u64, rate: f64) -> f64 {
    seconds as f64 / 3600.0 * rate
}

/// Hours rounded to one decimal place for display.
pub fn hours_display(hours: f64) -> String {
    format!("{:.1}", hours)
}

/// Money rounded to two decimal places for display.
pub fn earnings_display(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn project_summaries(store: &Store) -> Vec<ProjectSummary> {
    store
        .projects()
        .iter()
        .map(|project| {
            let client_name = store
                .client(project.client_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());

            ProjectSummary {
                project_id: project.id,
                project_name: project.name.clone(),
                client_name,
                rate: project.rate,
                total_seconds: total_seconds(store.entries(), project.id),
                entry_count: store.entries_for_project(project.id).count(),
            }
        })
        .collect()
}

pub fn client_totals(store: &Store) -> Vec<ClientTotals> {
    store
        .clients()
        .iter()
        .map(|client| {
            let (seconds, amount) = store.projects_for_client(client.id).fold(
                (0u64, 0.0f64),
                |(seconds, amount), project| {
                    let project_seconds = total_seconds(store.entries(), project.id);
                    (
                        seconds + project_seconds,
                        amount + earnings(project_seconds, project.rate),
                    )
                },
            );

            ClientTotals {
                client_id: client.id,
                client_name: client.name.clone(),
                total_seconds: seconds,
                earnings: amount,
            }
        })
        .collect()
}

/// Total seconds and earnings across every entry.
pub fn grand_total(store: &Store) -> (u64, f64) {
    store.entries().iter().fold((0, 0.0), |(seconds, amount), entry| {
        let rate = store.project(entry.project_id).map_or(0.0, |p| p.rate);
        (seconds + entry.duration, amount + earnings(entry.duration, rate))
    })
}

impl ProjectSummary {
    pub fn hours(&self) -> f64 {
        self.total_seconds as f64 / 3600.0
    }

    pub fn earnings(&self) -> f64 {
        earnings(self.total_seconds, self.rate)
    }
}
