//! Timed batch generation for live mode.
//!
//! `Idle -> Running -> {Completed, Interrupted}`. Each tick synthesizes and
//! renders the whole batch in memory, then appends it with one write. The
//! only suspension point is the pause between ticks.

mod cancel;
mod clock;

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngCore;
use tracing::{info, warn};

use challan_core::ViolationRecord;

use crate::errors::GenerationError;
use crate::output::AppendSink;
use crate::photo::{PhotoMeta, PhotoRenderer};
use crate::synth::RecordSynthesizer;

pub use cancel::CancelToken;
pub use clock::{Clock, ManualClock, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub total: Duration,
    pub interval: Duration,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Completed,
    Interrupted,
}

impl SchedulerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SchedulerState::Completed | SchedulerState::Interrupted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Running => "running",
            SchedulerState::Completed => "completed",
            SchedulerState::Interrupted => "interrupted",
        }
    }
}

/// Summary of one persisted tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based tick number.
    pub index: u64,
    pub at: DateTime<Utc>,
    pub count: usize,
    pub sample: Option<ViolationRecord>,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub state: SchedulerState,
    pub ticks: u64,
    pub records: u64,
    pub csv_path: PathBuf,
    pub photos_dir: PathBuf,
}

pub struct BatchScheduler<R, C> {
    config: ScheduleConfig,
    synthesizer: RecordSynthesizer<R>,
    renderer: Box<dyn PhotoRenderer>,
    sink: AppendSink,
    photos_dir: PathBuf,
    clock: C,
    state: SchedulerState,
}

impl<R: RngCore, C: Clock> BatchScheduler<R, C> {
    pub fn new(
        config: ScheduleConfig,
        synthesizer: RecordSynthesizer<R>,
        renderer: Box<dyn PhotoRenderer>,
        sink: AppendSink,
        photos_dir: PathBuf,
        clock: C,
    ) -> Self {
        Self {
            config,
            synthesizer,
            renderer,
            sink,
            photos_dir,
            clock,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs ticks until the duration elapses or `cancel` fires.
    ///
    /// Cancellation is observed between ticks; a tick that has started
    /// always finishes its append.
    pub async fn run<F>(
        &mut self,
        cancel: &CancelToken,
        mut on_tick: F,
    ) -> Result<RunSummary, GenerationError>
    where
        F: FnMut(&TickReport),
    {
        if self.state.is_terminal() {
            return Err(GenerationError::InvalidConfig(format!(
                "scheduler already {}",
                self.state.as_str()
            )));
        }
        if self.config.interval.is_zero() {
            return Err(GenerationError::InvalidConfig(
                "tick interval must be positive".to_string(),
            ));
        }

        self.state = SchedulerState::Running;
        let start = self.clock.uptime();
        let mut ticks = 0_u64;
        let mut records = 0_u64;

        info!(
            event = "schedule_started",
            total_secs = self.config.total.as_secs(),
            interval_secs = self.config.interval.as_secs(),
            batch_size = self.config.batch_size,
            backend = self.renderer.backend().as_str()
        );

        loop {
            if cancel.is_cancelled() {
                self.state = SchedulerState::Interrupted;
                break;
            }
            let elapsed = self.clock.uptime().saturating_sub(start);
            if elapsed >= self.config.total {
                self.state = SchedulerState::Completed;
                break;
            }

            ticks += 1;
            let report = match self.tick(ticks) {
                Ok(report) => report,
                Err(err) => {
                    self.state = SchedulerState::Interrupted;
                    warn!(event = "tick_failed", tick = ticks, error = %err);
                    return Err(err);
                }
            };
            records += report.count as u64;
            on_tick(&report);

            let elapsed = self.clock.uptime().saturating_sub(start);
            let remaining = self.config.total.saturating_sub(elapsed);
            if remaining.is_zero() {
                self.state = SchedulerState::Completed;
                break;
            }
            let pause = self.config.interval.min(remaining);
            tokio::select! {
                _ = self.clock.sleep(pause) => {}
                _ = cancel.cancelled() => {}
            }
        }

        info!(
            event = "schedule_finished",
            state = self.state.as_str(),
            ticks,
            records
        );

        Ok(RunSummary {
            state: self.state,
            ticks,
            records,
            csv_path: self.sink.path().to_path_buf(),
            photos_dir: self.photos_dir.clone(),
        })
    }

    fn tick(&mut self, index: u64) -> Result<TickReport, GenerationError> {
        let mut batch = Vec::with_capacity(self.config.batch_size);
        for _ in 0..self.config.batch_size {
            let record = self.synthesizer.next_record(self.clock.now());
            let photo = self
                .renderer
                .render(&PhotoMeta::from_record(&record), self.synthesizer.rng_mut())?;
            batch.push(record.with_photo(photo.to_string_lossy()));
        }

        let bytes = self.sink.append(&batch)?;
        let at = self.clock.now();
        info!(event = "tick_persisted", tick = index, records = batch.len(), bytes);

        Ok(TickReport {
            index,
            at,
            count: batch.len(),
            sample: batch.into_iter().next(),
        })
    }
}
