use anyhow::Result;
use chrono::Local;
use daybook_app::timer::engine::format_elapsed;
use daybook_app::Daybook;
use daybook_core::{
    export::{DirectoryTarget, ShareOutcome},
    models::{Config, TimeEntry, TimerState},
    report::{self, UNKNOWN},
    storage::ConfigStorage,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::time::{interval, Duration};

use crate::cli::{ClientCommand, Command, ProjectCommand};

#[derive(Debug, Serialize)]
struct StatusView {
    state: &'static str,
    project_id: Option<i64>,
    project: Option<String>,
    client: Option<String>,
    elapsed_seconds: u64,
    elapsed: String,
}

pub async fn run(daybook: &mut Daybook, command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Client { action } => match action {
            ClientCommand::Add { name } => {
                let client = daybook.add_client(&name).await?;
                println!("Added client {} ({})", client.name, client.id);
            }
            ClientCommand::List => list_clients(daybook),
        },
        Command::Project { action } => match action {
            ProjectCommand::Add { name, client, rate } => {
                let client_id = daybook.resolve_client(&client)?.id;
                let project = daybook
                    .add_project(&name, Some(client_id), rate.as_deref().unwrap_or(""))
                    .await?;
                println!(
                    "Added project {} ({}) at {}/h",
                    project.name,
                    project.id,
                    report::earnings_display(project.rate)
                );
            }
            ProjectCommand::List => list_projects(daybook),
        },
        Command::Start { project, client } => {
            let project_id = daybook.resolve_project(&project, client.as_deref())?.id;
            if daybook.active_project() == Some(project_id) {
                println!("Already timing {}", project_label(daybook, project_id));
                return Ok(());
            }

            if let Some(previous) = daybook.start_timer(project_id).await? {
                print_recorded(daybook, &previous);
            }
            println!("Started timer on {}", project_label(daybook, project_id));
        }
        Command::Pause => {
            let was_running = daybook.timer_state() != TimerState::Idle;
            match daybook.pause_timer().await {
                Some(entry) => print_recorded(daybook, &entry),
                None if was_running => println!("Timer cleared, nothing to record"),
                None => println!("No timer running"),
            }
        }
        Command::Stop => {
            let was_running = daybook.timer_state() != TimerState::Idle;
            match daybook.stop_timer().await {
                Some(entry) => print_recorded(daybook, &entry),
                None if was_running => println!("Timer cleared, nothing to record"),
                None => println!("No timer running"),
            }
        }
        Command::Status { json } => print_status(daybook, json)?,
        Command::Watch => watch(daybook).await?,
        Command::Entries { limit } => list_entries(daybook, limit),
        Command::Report => print_report(daybook),
        Command::Export { out } => {
            let dir = match out.or_else(|| config.export.output_dir.clone()) {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };

            match daybook
                .export_to_csv(Arc::new(DirectoryTarget::new(dir)))
                .await?
            {
                ShareOutcome::Shared(location) => println!("Exported to {}", location),
                ShareOutcome::Cancelled => println!("Export cancelled"),
            }
        }
        Command::Config => {}
    }

    Ok(())
}

pub fn show_config(storage: &ConfigStorage, config: &Config, data_dir: &Path) -> Result<()> {
    println!("Config file: {}", storage.path().display());
    println!("Data directory: {}", data_dir.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn project_label(daybook: &Daybook, project_id: i64) -> String {
    match daybook.project_with_client(project_id) {
        Some((project, client)) => format!(
            "{} / {}",
            client.map_or(UNKNOWN, |c| c.name.as_str()),
            project.name
        ),
        None => UNKNOWN.to_string(),
    }
}

fn print_recorded(daybook: &Daybook, entry: &TimeEntry) {
    println!(
        "Recorded {} on {} ({})",
        entry.duration_formatted(),
        project_label(daybook, entry.project_id),
        entry.status.as_str()
    );
}

fn list_clients(daybook: &Daybook) {
    let store = daybook.store();
    if store.clients().is_empty() {
        println!("No clients yet");
        return;
    }

    for client in store.clients() {
        println!(
            "{:>14}  {:<50}  {} projects",
            client.id,
            client.name,
            store.projects_for_client(client.id).count()
        );
    }
}

fn list_projects(daybook: &Daybook) {
    let summaries = report::project_summaries(daybook.store());
    if summaries.is_empty() {
        println!("No projects yet");
        return;
    }

    for summary in summaries {
        println!(
            "{:>14}  {} / {}  rate {}  {}h  {}",
            summary.project_id,
            summary.client_name,
            summary.project_name,
            report::earnings_display(summary.rate),
            daybook.total_hours(summary.project_id),
            daybook.total_earnings(summary.project_id),
        );
    }
}

fn list_entries(daybook: &Daybook, limit: usize) {
    let store = daybook.store();
    if store.entries().is_empty() {
        println!("No time entries yet");
        return;
    }

    for entry in store.entries_recent_first().take(limit) {
        println!(
            "{}  {}  {}  {}",
            entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            entry.duration_formatted(),
            entry.status.as_str(),
            project_label(daybook, entry.project_id)
        );
    }
}

fn print_report(daybook: &Daybook) {
    let store = daybook.store();

    println!("By project:");
    for summary in report::project_summaries(store) {
        println!(
            "  {} / {}: {}h, {}",
            summary.client_name,
            summary.project_name,
            report::hours_display(summary.hours()),
            report::earnings_display(summary.earnings())
        );
    }

    println!("By client:");
    for totals in report::client_totals(store) {
        println!(
            "  {}: {}h, {}",
            totals.client_name,
            report::hours_display(totals.total_seconds as f64 / 3600.0),
            report::earnings_display(totals.earnings)
        );
    }

    let (seconds, earnings) = report::grand_total(store);
    println!(
        "Total: {}h, {}",
        report::hours_display(seconds as f64 / 3600.0),
        report::earnings_display(earnings)
    );
}

fn print_status(daybook: &Daybook, json: bool) -> Result<()> {
    let resolved = daybook
        .active_project()
        .and_then(|id| daybook.project_with_client(id));

    let view = StatusView {
        state: daybook.timer_state().as_str(),
        project_id: daybook.active_project(),
        project: resolved.map(|(p, _)| p.name.clone()),
        client: resolved.and_then(|(_, c)| c.map(|c| c.name.clone())),
        elapsed_seconds: daybook.elapsed(),
        elapsed: format_elapsed(daybook.elapsed()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    match view.project_id {
        Some(project_id) => println!(
            "{}  {}  {}",
            view.state,
            project_label(daybook, project_id),
            view.elapsed
        ),
        None => println!("{}", view.state),
    }
    Ok(())
}

async fn watch(daybook: &mut Daybook) -> Result<()> {
    let Some(project_id) = daybook.active_project() else {
        println!("No timer running");
        return Ok(());
    };

    let label = project_label(daybook, project_id);
    println!("Watching {} (Ctrl-C to leave, the timer keeps running)", label);

    let mut ticker = interval(Duration::from_secs(1));
    // the first tick completes immediately
    ticker.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(elapsed) = daybook.tick() {
                    write!(stdout, "\r{}  {}", label, format_elapsed(elapsed))?;
                    stdout.flush()?;
                }
            }
            result = &mut ctrl_c => {
                result?;
                writeln!(stdout)?;
                break;
            }
        }
    }

    Ok(())
}
