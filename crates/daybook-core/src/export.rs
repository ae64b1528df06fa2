//! CSV export of time entries

use crate::{
    models::TimeEntry,
    report::UNKNOWN,
    Error, Result, Store,
};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

pub const CSV_HEADER: [&str; 7] = [
    "Date",
    "Client",
    "Project",
    "Duration (hours)",
    "Rate",
    "Total",
    "Status",
];

pub const CSV_MIME_TYPE: &str = "text/csv";

/// A finished export, ready to be handed to a share or save target.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShareOutcome {
    /// Delivered; carries a human-readable location
    Shared(String),
    /// The user dismissed the share sheet. Not an error.
    Cancelled,
}

/// Whatever receives the exported file: a share sheet, a save dialog, a
/// directory on disk.
pub trait ExportTarget: Send + Sync {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<ShareOutcome>;
}

/// Writes the artifact into a directory.
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ExportTarget for DirectoryTarget {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<ShareOutcome> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.contents)?;
        Ok(ShareOutcome::Shared(path.display().to_string()))
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("daybook-export-{}.csv", date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone)]
pub struct CsvExporter {
    date_format: String,
    offset: FixedOffset,
}

impl CsvExporter {
    pub fn new(date_format: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            date_format: date_format.into(),
            offset,
        }
    }

    /// Dates rendered in the machine's current UTC offset.
    pub fn local(date_format: impl Into<String>) -> Self {
        Self::new(date_format, *Local::now().offset())
    }

    /// Write the header and one row per entry, oldest first.
    pub fn write<W: Write>(&self, store: &Store, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(writer);

        writer.write_record(CSV_HEADER)?;
        for entry in store.entries() {
            writer.write_record(self.row(store, entry)?)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn to_csv(&self, store: &Store) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(store, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Export(e.to_string()))
    }

    /// Build the export file. Fails when there is nothing to export.
    pub fn artifact(&self, store: &Store, now: DateTime<Utc>) -> Result<ExportArtifact> {
        if store.entries().is_empty() {
            return Err(Error::Export("No time entries to export".to_string()));
        }

        Ok(ExportArtifact {
            file_name: export_file_name(now.date_naive()),
            mime_type: CSV_MIME_TYPE,
            contents: self.to_csv(store)?,
        })
    }

    fn row(&self, store: &Store, entry: &TimeEntry) -> Result<[String; 7]> {
        let project = store.project(entry.project_id);
        let client = project.and_then(|p| store.client(p.client_id));
        let rate = project.map_or(0.0, |p| p.rate);

        // the total is billed on the rounded hours shown in the row
        let hours = format!("{:.2}", entry.duration_hours());
        let total = hours.parse::<f64>().unwrap_or(0.0) * rate;

        let mut date = String::new();
        write!(
            date,
            "{}",
            entry
                .date
                .with_timezone(&self.offset)
                .format(&self.date_format)
        )
        .map_err(|_| Error::Export(format!("Invalid date format '{}'", self.date_format)))?;

        Ok([
            date,
            client.map_or(UNKNOWN, |c| c.name.as_str()).to_string(),
            project.map_or(UNKNOWN, |p| p.name.as_str()).to_string(),
            hours,
            rate.to_string(),
            format!("{:.2}", total),
            entry.status.as_str().to_string(),
        ])
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::local(crate::models::ExportConfig::default().date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryStatus, FinishedTimer};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn utc_exporter() -> CsvExporter {
        CsvExporter::new("%m/%d/%Y", FixedOffset::east_opt(0).unwrap())
    }

    fn log(store: &mut Store, project_id: i64, duration: u64, status: EntryStatus, hour: u32) {
        store.record_entry(&FinishedTimer {
            project_id,
            duration,
            status,
            finished_at: at(hour),
        });
    }

    #[test]
    fn test_export_rows_in_insertion_order() {
        let mut store = Store::new();
        let client = store.add_client("Acme, Inc.", at(8)).unwrap().id;
        let project = store.add_project("Website", Some(client), "50", at(8)).unwrap().id;
        log(&mut store, project, 5400, EntryStatus::Completed, 9);
        log(&mut store, project, 125, EntryStatus::Paused, 10);

        let csv = utc_exporter().to_csv(&store).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Date,Client,Project,Duration (hours),Rate,Total,Status"
        );
        assert_eq!(
            lines[1],
            "03/01/2024,\"Acme, Inc.\",Website,1.50,50,75.00,completed"
        );
        assert_eq!(
            lines[2],
            "03/01/2024,\"Acme, Inc.\",Website,0.03,50,1.50,paused"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_missing_references_render_unknown() {
        let mut store = Store::new();
        log(&mut store, 4242, 3600, EntryStatus::Completed, 9);

        let csv = utc_exporter().to_csv(&store).unwrap();
        assert_eq!(
            csv.lines().nth(1),
            Some("03/01/2024,Unknown,Unknown,1.00,0,0.00,completed")
        );
    }

    #[test]
    fn test_date_uses_offset_and_format() {
        let mut store = Store::new();
        log(&mut store, 1, 60, EntryStatus::Completed, 23);

        let tokyo = CsvExporter::new("%Y-%m-%d", FixedOffset::east_opt(9 * 3600).unwrap());
        let csv = tokyo.to_csv(&store).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("2024-03-02,"));
    }

    #[test]
    fn test_bad_date_format_is_an_error() {
        let mut store = Store::new();
        log(&mut store, 2, 3600, EntryStatus::Completed, 9);

        let exporter = CsvExporter::new("%Q", FixedOffset::east_opt(0).unwrap());
        assert!(matches!(exporter.to_csv(&store), Err(Error::Export(_))));
    }

    #[test]
    fn test_artifact_requires_entries() {
        let store = Store::new();
        let result = utc_exporter().artifact(&store, at(12));
        assert!(matches!(result, Err(Error::Export(_))));
    }

    #[test]
    fn test_artifact_metadata() {
        let mut store = Store::new();
        log(&mut store, 1, 60, EntryStatus::Completed, 9);

        let artifact = utc_exporter().artifact(&store, at(12)).unwrap();
        assert_eq!(artifact.file_name, "daybook-export-2024-03-01.csv");
        assert_eq!(artifact.mime_type, "text/csv");
        assert!(artifact.contents.starts_with("Date,Client"));
    }

    #[test]
    fn test_directory_target_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = DirectoryTarget::new(temp_dir.path().join("exports"));
        let artifact = ExportArtifact {
            file_name: "daybook-export-2024-03-01.csv".to_string(),
            mime_type: CSV_MIME_TYPE,
            contents: "Date\n".to_string(),
        };

        let outcome = target.deliver(&artifact).unwrap();
        let path = temp_dir.path().join("exports/daybook-export-2024-03-01.csv");
        assert_eq!(outcome, ShareOutcome::Shared(path.display().to_string()));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Date\n");
    }
}
