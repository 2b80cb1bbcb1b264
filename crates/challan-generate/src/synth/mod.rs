//! Record synthesis: catalogue pick, plate, timestamp and amount rules.

pub mod plate;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use challan_core::{AmountRange, Catalogue, ViolationRecord};

use self::plate::{random_letter, random_plate};

/// Global credits draw range, independent of the violation code.
pub const CREDITS_RANGE: AmountRange = AmountRange::new(0, 500);
pub const DEFAULT_WINDOW_DAYS: f64 = 30.0;
/// Largest back-dating window, about 1000 years.
pub const MAX_WINDOW_DAYS: f64 = 365_000.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// How a record timestamp relates to the generation instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimestampRule {
    /// Historical fixture data: a random instant inside the trailing window,
    /// local time without offset.
    Backdated { window_days: f64 },
    /// Live feed: the generation instant itself, UTC with offset.
    Live,
}

impl TimestampRule {
    fn render(&self, rng: &mut dyn RngCore, now: DateTime<Utc>) -> String {
        match *self {
            TimestampRule::Backdated { window_days } => {
                let window_days = if window_days.is_finite() {
                    window_days.clamp(0.0, MAX_WINDOW_DAYS)
                } else {
                    0.0
                };
                let days = rng.random_range(0.0..=window_days);
                let seconds = rng.random_range(0.0..=SECONDS_PER_DAY);
                let offset_us = ((days * SECONDS_PER_DAY + seconds) * 1_000_000.0) as i64;
                let local = now.with_timezone(&Local).naive_local();
                let stamp = local
                    .checked_sub_signed(TimeDelta::microseconds(offset_us))
                    .unwrap_or(NaiveDateTime::MIN);
                stamp.format("%Y-%m-%dT%H:%M:%S").to_string()
            }
            TimestampRule::Live => now.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}

/// Everything the synthesizer draws from besides the RNG.
#[derive(Debug, Clone)]
pub struct SynthesisRules {
    pub catalogue: Catalogue,
    pub credits_range: AmountRange,
    pub timestamp: TimestampRule,
}

impl SynthesisRules {
    pub fn batch(window_days: f64) -> Self {
        Self {
            catalogue: Catalogue::standard(),
            credits_range: CREDITS_RANGE,
            timestamp: TimestampRule::Backdated { window_days },
        }
    }

    pub fn live() -> Self {
        Self {
            catalogue: Catalogue::standard(),
            credits_range: CREDITS_RANGE,
            timestamp: TimestampRule::Live,
        }
    }
}

impl Default for SynthesisRules {
    fn default() -> Self {
        Self::batch(DEFAULT_WINDOW_DAYS)
    }
}

/// Credits may never exceed the challan. An over-range draw becomes a tenth
/// of the challan, not the challan itself.
pub fn settle_credits(challan: u32, credits_draw: u32) -> u32 {
    if credits_draw > challan {
        challan / 10
    } else {
        credits_draw
    }
}

/// Produces one record from `rules`, drawing every random field from `rng`.
pub fn synthesize(
    rng: &mut dyn RngCore,
    rules: &SynthesisRules,
    now: DateTime<Utc>,
) -> ViolationRecord {
    let id = short_id(rng);
    let timestamp = rules.timestamp.render(rng, now);
    let vehicle_plate = random_plate(rng);

    let codes = &rules.catalogue;
    let violation_code = codes
        .codes()
        .nth(rng.random_range(0..codes.len()))
        .unwrap_or_default();
    let violation_text = codes
        .description(violation_code)
        .unwrap_or_default()
        .to_string();
    let offender_name = random_letter(rng).to_string();

    let range = codes.challan_range(violation_code);
    let challan_amount = rng.random_range(range.low..=range.high);
    let credits_draw = rng.random_range(rules.credits_range.low..=rules.credits_range.high);
    let credits_amount = settle_credits(challan_amount, credits_draw);

    ViolationRecord {
        id,
        timestamp,
        vehicle_plate,
        violation_code,
        violation_text,
        offender_name,
        challan_amount,
        credits_amount,
        photo_reference: None,
    }
}

/// First 8 hex characters of a v4 UUID built from RNG bytes.
fn short_id(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
    let mut id = uuid.simple().to_string();
    id.truncate(8);
    id
}

/// Owns an RNG and a rule set; yields records on demand.
#[derive(Debug, Clone)]
pub struct RecordSynthesizer<R> {
    rng: R,
    rules: SynthesisRules,
}

impl<R: RngCore> RecordSynthesizer<R> {
    pub fn new(rng: R, rules: SynthesisRules) -> Self {
        Self { rng, rules }
    }

    pub fn next_record(&mut self, now: DateTime<Utc>) -> ViolationRecord {
        synthesize(&mut self.rng, &self.rules, now)
    }

    pub fn generate(&mut self, count: usize, now: DateTime<Utc>) -> Vec<ViolationRecord> {
        (0..count).map(|_| self.next_record(now)).collect()
    }

    /// Shared RNG for collaborators that need draws in the same stream.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl RecordSynthesizer<ChaCha8Rng> {
    /// Seeded runs are reproducible; unseeded runs take entropy from the
    /// thread RNG.
    pub fn seeded(seed: Option<u64>, rules: SynthesisRules) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self::new(rng, rules)
    }
}

/// Generates `count` records with a fresh RNG.
pub fn synthesize_many(
    count: usize,
    seed: Option<u64>,
    rules: &SynthesisRules,
    now: DateTime<Utc>,
) -> Vec<ViolationRecord> {
    let mut synthesizer = RecordSynthesizer::seeded(seed, rules.clone());
    let records = synthesizer.generate(count, now);
    info!(count = records.len(), seed = ?seed, "records synthesized");
    records
}
