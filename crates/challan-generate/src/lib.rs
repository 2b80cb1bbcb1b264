//! Synthetic traffic-violation generation for challan fixtures.
//!
//! The pipeline is synthesize -> render photo -> persist. Batch mode calls
//! the synthesizer directly and writes snapshots; live mode drives the whole
//! pipeline from [`BatchScheduler`] on a timer.

pub mod config;
pub mod errors;
pub mod output;
pub mod photo;
pub mod scheduler;
pub mod synth;

pub use config::{LiveConfig, LiveLayout};
pub use errors::GenerationError;
pub use output::{AppendSink, SnapshotReport, SnapshotSink};
pub use photo::{PhotoMeta, PhotoRenderer, PhotoStyle, RendererBackend, select_renderer};
pub use scheduler::{
    BatchScheduler, CancelToken, Clock, ManualClock, RunSummary, ScheduleConfig, SchedulerState,
    SystemClock, TickReport,
};
pub use synth::{
    CREDITS_RANGE, MAX_WINDOW_DAYS, RecordSynthesizer, SynthesisRules, TimestampRule,
    settle_credits, synthesize, synthesize_many,
};
