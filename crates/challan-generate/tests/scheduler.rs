use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use challan_core::ViolationRecord;
use challan_generate::photo::StubRenderer;
use challan_generate::{
    AppendSink, BatchScheduler, CancelToken, LiveLayout, ManualClock, RecordSynthesizer,
    ScheduleConfig, SchedulerState, SynthesisRules, TickReport,
};

fn temp_layout(label: &str) -> LiveLayout {
    let mut dir = std::env::temp_dir();
    dir.push(format!("challan_scheduler_{label}_{}", uuid::Uuid::new_v4()));
    let layout = LiveLayout::new(&dir);
    layout.ensure().expect("create layout");
    layout
}

fn scheduler(
    layout: &LiveLayout,
    config: ScheduleConfig,
) -> BatchScheduler<ChaCha8Rng, ManualClock> {
    let start = Utc
        .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid instant");
    BatchScheduler::new(
        config,
        RecordSynthesizer::new(ChaCha8Rng::seed_from_u64(17), SynthesisRules::live()),
        Box::new(StubRenderer::new(&layout.photos_dir)),
        AppendSink::open(&layout.csv_path).expect("open sink"),
        layout.photos_dir.clone(),
        ManualClock::starting_at(start),
    )
}

fn read_rows(path: &Path) -> Vec<ViolationRecord> {
    let mut reader = csv::Reader::from_path(path).expect("open csv");
    reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("deserialize csv")
}

#[tokio::test]
async fn ninety_seconds_at_thirty_second_ticks_runs_three_batches() {
    let layout = temp_layout("three_ticks");
    let config = ScheduleConfig {
        total: Duration::from_secs(90),
        interval: Duration::from_secs(30),
        batch_size: 5,
    };
    let mut scheduler = scheduler(&layout, config);
    assert_eq!(scheduler.state(), SchedulerState::Idle);

    let mut ticks: Vec<TickReport> = Vec::new();
    let summary = scheduler
        .run(&CancelToken::new(), |report| ticks.push(report.clone()))
        .await
        .expect("run scheduler");

    assert_eq!(summary.state, SchedulerState::Completed);
    assert_eq!(scheduler.state(), SchedulerState::Completed);
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.records, 15);
    assert_eq!(summary.csv_path, layout.csv_path);

    let offsets: Vec<i64> = ticks
        .iter()
        .map(|tick| (tick.at - ticks[0].at).num_seconds())
        .collect();
    assert_eq!(offsets, vec![0, 30, 60]);
    assert_eq!(
        scheduler.clock().sleeps(),
        vec![Duration::from_secs(30); 3]
    );

    let rows = read_rows(&layout.csv_path);
    assert_eq!(rows.len(), 15);
    for row in &rows {
        let photo = row.photo_reference.as_deref().expect("photo reference");
        assert!(photo.ends_with(".jpg.txt"), "{photo}");
        assert!(PathBuf::from(photo).exists());
        assert!(row.timestamp.ends_with("+00:00"));
    }
    assert_eq!(ticks[0].sample.as_ref(), rows.first());
}

#[tokio::test]
async fn last_pause_is_capped_by_remaining_time() {
    let layout = temp_layout("short_tail");
    let config = ScheduleConfig {
        total: Duration::from_secs(70),
        interval: Duration::from_secs(30),
        batch_size: 1,
    };
    let mut scheduler = scheduler(&layout, config);
    let summary = scheduler
        .run(&CancelToken::new(), |_| {})
        .await
        .expect("run scheduler");

    assert_eq!(summary.ticks, 3);
    assert_eq!(
        scheduler.clock().sleeps(),
        vec![
            Duration::from_secs(30),
            Duration::from_secs(30),
            Duration::from_secs(10)
        ]
    );
}

#[tokio::test]
async fn cancellation_stops_after_in_flight_batch() {
    let layout = temp_layout("cancel");
    let config = ScheduleConfig {
        total: Duration::from_secs(600),
        interval: Duration::from_secs(30),
        batch_size: 4,
    };
    let mut scheduler = scheduler(&layout, config);
    let cancel = CancelToken::new();
    let trigger = cancel.clone();

    let summary = scheduler
        .run(&cancel, |report| {
            if report.index == 2 {
                trigger.cancel();
            }
        })
        .await
        .expect("run scheduler");

    assert_eq!(summary.state, SchedulerState::Interrupted);
    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.records, 8);
    assert_eq!(read_rows(&layout.csv_path).len(), 8);
}

#[tokio::test]
async fn cancelled_before_start_writes_nothing() {
    let layout = temp_layout("precancel");
    let config = ScheduleConfig {
        total: Duration::from_secs(60),
        interval: Duration::from_secs(30),
        batch_size: 5,
    };
    let mut scheduler = scheduler(&layout, config);
    let cancel = CancelToken::new();
    cancel.cancel();

    let summary = scheduler.run(&cancel, |_| {}).await.expect("run scheduler");
    assert_eq!(summary.state, SchedulerState::Interrupted);
    assert_eq!(summary.ticks, 0);
    assert!(read_rows(&layout.csv_path).is_empty());
    assert_eq!(
        fs::read_dir(&layout.photos_dir).expect("read photos").count(),
        0
    );
}

#[tokio::test]
async fn finished_scheduler_does_not_tick_again() {
    let layout = temp_layout("rerun");
    let config = ScheduleConfig {
        total: Duration::from_secs(30),
        interval: Duration::from_secs(30),
        batch_size: 2,
    };
    let mut scheduler = scheduler(&layout, config);
    scheduler
        .run(&CancelToken::new(), |_| {})
        .await
        .expect("first run");

    let second = scheduler.run(&CancelToken::new(), |_| {}).await;
    assert!(second.is_err());
    assert_eq!(read_rows(&layout.csv_path).len(), 2);
}

#[tokio::test]
async fn failed_tick_leaves_scheduler_terminal() {
    let layout = temp_layout("failed_tick");
    let config = ScheduleConfig {
        total: Duration::from_secs(90),
        interval: Duration::from_secs(30),
        batch_size: 3,
    };
    let mut scheduler = scheduler(&layout, config);
    fs::remove_dir_all(&layout.photos_dir).expect("remove photos dir");

    let first = scheduler.run(&CancelToken::new(), |_| {}).await;
    assert!(first.is_err());
    assert_eq!(scheduler.state(), SchedulerState::Interrupted);
    assert!(scheduler.state().is_terminal());

    let second = scheduler.run(&CancelToken::new(), |_| {}).await;
    assert!(second.is_err());
    assert!(read_rows(&layout.csv_path).is_empty());
}
