use daybook_core::models::{Client, Project, TimeEntry};
use serde::{Deserialize, Serialize};

use crate::timer::TimerEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum DaybookEvent {
    Timer(TimerEvent),
    ClientAdded { client: Client },
    ProjectAdded { project: Project },
    EntryRecorded { entry: TimeEntry },
    Exported { file_name: String },
}

impl DaybookEvent {
    /// Message for the notification collaborator, if this event warrants one
    pub fn notification(&self) -> Option<String> {
        match self {
            DaybookEvent::Timer(event) => event.notification(),
            _ => None,
        }
    }
}
