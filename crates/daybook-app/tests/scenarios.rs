use chrono::{TimeZone, Utc};
use daybook_app::{Daybook, DaybookEvent, TimerEventType};
use daybook_core::{
    export::DirectoryTarget,
    models::{EntryStatus, TimerState},
    storage::{DaybookStorage, FileStore, MemoryStore},
    Error, ManualClock,
};
use std::sync::Arc;
use tempfile::TempDir;

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
}

async fn open(clock: &ManualClock) -> Daybook {
    Daybook::open(
        DaybookStorage::new(Arc::new(MemoryStore::new())),
        Arc::new(clock.clone()),
    )
    .await
}

/// Let `seconds` pass in the foreground, one tick per second.
fn run_for(daybook: &mut Daybook, clock: &ManualClock, seconds: u64) {
    for _ in 0..seconds {
        clock.advance_secs(1);
        daybook.tick();
    }
}

#[tokio::test]
async fn scenario_track_and_bill_one_session() {
    let clock = clock();
    let mut daybook = open(&clock).await;

    let acme = daybook.add_client("Acme").await.unwrap();
    let website = daybook
        .add_project("Website", Some(acme.id), "50")
        .await
        .unwrap();

    assert!(daybook.start_timer(website.id).await.unwrap().is_none());
    run_for(&mut daybook, &clock, 125);
    let entry = daybook.stop_timer().await.unwrap();

    assert_eq!(entry.duration, 125);
    assert_eq!(entry.status, EntryStatus::Completed);
    assert_eq!(daybook.store().entries().len(), 1);
    assert_eq!(daybook.total_hours(website.id), "0.0");
    assert_eq!(daybook.total_earnings(website.id), "1.74");
    assert_eq!(daybook.timer_state(), TimerState::Idle);
}

#[tokio::test]
async fn scenario_background_time_counted_once() {
    let clock = clock();
    let mut daybook = open(&clock).await;
    let acme = daybook.add_client("Acme").await.unwrap();
    let project = daybook
        .add_project("Website", Some(acme.id), "")
        .await
        .unwrap();

    daybook.start_timer(project.id).await.unwrap();
    run_for(&mut daybook, &clock, 20);

    daybook.enter_background().await;
    assert_eq!(daybook.timer_state(), TimerState::Suspended);
    // ticks keep firing but must not count
    run_for(&mut daybook, &clock, 300);
    assert_eq!(daybook.elapsed(), 20);

    assert_eq!(daybook.enter_foreground(), Some(300));
    assert_eq!(daybook.elapsed(), 320);
    assert_eq!(daybook.timer_state(), TimerState::Running);

    run_for(&mut daybook, &clock, 1);
    assert_eq!(daybook.elapsed(), 321);
}

#[tokio::test]
async fn scenario_switching_projects_closes_previous_session() {
    let clock = clock();
    let mut daybook = open(&clock).await;
    let mut events = daybook.subscribe();

    let acme = daybook.add_client("Acme").await.unwrap();
    let a = daybook.add_project("A", Some(acme.id), "").await.unwrap();
    let b = daybook.add_project("B", Some(acme.id), "").await.unwrap();

    daybook.start_timer(a.id).await.unwrap();
    run_for(&mut daybook, &clock, 10);

    let previous = daybook.start_timer(b.id).await.unwrap().unwrap();
    assert_eq!(previous.project_id, a.id);
    assert_eq!(previous.duration, 10);
    assert_eq!(previous.status, EntryStatus::Completed);

    assert_eq!(daybook.active_project(), Some(b.id));
    assert_eq!(daybook.elapsed(), 0);

    // A's entry is recorded before B's timer starts
    let mut order = Vec::new();
    while let Ok(event) = events.try_recv() {
        match event {
            DaybookEvent::EntryRecorded { entry } => order.push(format!("entry:{}", entry.project_id)),
            DaybookEvent::Timer(timer) if timer.event_type == TimerEventType::Started => {
                order.push(format!("started:{}", timer.project_id))
            }
            _ => {}
        }
    }
    assert_eq!(
        order,
        vec![
            format!("started:{}", a.id),
            format!("entry:{}", a.id),
            format!("started:{}", b.id),
        ]
    );
}

#[tokio::test]
async fn scenario_export_with_no_entries() {
    let clock = clock();
    let mut daybook = open(&clock).await;
    let temp_dir = TempDir::new().unwrap();

    assert!(!daybook.can_export());
    let result = daybook
        .export_to_csv(Arc::new(DirectoryTarget::new(temp_dir.path().to_path_buf())))
        .await;

    assert!(matches!(result, Err(Error::Export(_))));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn scenario_client_names_differing_in_case() {
    let clock = clock();
    let mut daybook = open(&clock).await;

    daybook.add_client("Acme").await.unwrap();
    let second = daybook.add_client("acme").await;

    assert!(matches!(second, Err(Error::Duplicate(_))));
    assert_eq!(daybook.store().clients().len(), 1);
}

#[tokio::test]
async fn pause_when_idle_is_a_noop() {
    let clock = clock();
    let mut daybook = open(&clock).await;

    assert!(daybook.pause_timer().await.is_none());
    assert!(daybook.stop_timer().await.is_none());
    assert_eq!(daybook.timer_state(), TimerState::Idle);
    assert!(daybook.store().entries().is_empty());
}

#[tokio::test]
async fn pause_records_paused_entry() {
    let clock = clock();
    let mut daybook = open(&clock).await;
    let acme = daybook.add_client("Acme").await.unwrap();
    let project = daybook
        .add_project("Website", Some(acme.id), "")
        .await
        .unwrap();

    daybook.start_timer(project.id).await.unwrap();
    run_for(&mut daybook, &clock, 42);
    let entry = daybook.pause_timer().await.unwrap();

    assert_eq!(entry.status, EntryStatus::Paused);
    assert_eq!(entry.duration, 42);
    assert_eq!(daybook.elapsed(), 0);
    assert_eq!(daybook.timer_state(), TimerState::Idle);
}

#[tokio::test]
async fn data_survives_restart_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let clock = clock();
    let storage = || DaybookStorage::new(Arc::new(FileStore::new(temp_dir.path().to_path_buf())));

    let mut daybook = Daybook::open(storage(), Arc::new(clock.clone())).await;
    let acme = daybook.add_client("Acme").await.unwrap();
    let project = daybook
        .add_project("Website", Some(acme.id), "80")
        .await
        .unwrap();
    daybook.start_timer(project.id).await.unwrap();
    run_for(&mut daybook, &clock, 1800);
    daybook.stop_timer().await.unwrap();
    drop(daybook);

    let reopened = Daybook::open(storage(), Arc::new(clock.clone())).await;
    assert!(reopened.load_error().is_none());
    assert_eq!(reopened.store().entries().len(), 1);
    assert_eq!(reopened.total_hours(project.id), "0.5");
    assert_eq!(reopened.total_earnings(project.id), "40.00");

    let (found, client) = reopened.project_with_client(project.id).unwrap();
    assert_eq!(found.name, "Website");
    assert_eq!(client.unwrap().name, "Acme");
}

#[tokio::test]
async fn export_writes_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let clock = clock();
    let mut daybook = open(&clock).await;
    let acme = daybook.add_client("Acme").await.unwrap();
    let project = daybook
        .add_project("Website", Some(acme.id), "50")
        .await
        .unwrap();
    daybook.start_timer(project.id).await.unwrap();
    run_for(&mut daybook, &clock, 3600);
    daybook.stop_timer().await;

    daybook
        .export_to_csv(Arc::new(DirectoryTarget::new(temp_dir.path().to_path_buf())))
        .await
        .unwrap();

    let contents =
        std::fs::read_to_string(temp_dir.path().join("daybook-export-2024-03-01.csv")).unwrap();
    let row = contents.lines().nth(1).unwrap();
    assert!(row.ends_with(",Acme,Website,1.00,50,50.00,completed"));
}
