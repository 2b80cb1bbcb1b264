use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::photo::PhotoStyle;
use crate::scheduler::ScheduleConfig;

const MIN_IMAGE_SIDE: u32 = 64;

/// Live-mode settings. Defaults are the built-in run constants; a TOML file
/// may override any subset of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Total run time.
    pub run_minutes: u64,
    /// Pause after each tick, capped by the remaining run time.
    pub interval_seconds: u64,
    /// Records synthesized per tick.
    pub records_per_interval: usize,
    pub image_width: u32,
    pub image_height: u32,
    pub font_size: u32,
    /// Root for the CSV, photos and run log.
    pub output_dir: PathBuf,
    /// TrueType font for overlays; the built-in bitmap font is used otherwise.
    pub font_path: Option<PathBuf>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            run_minutes: 30,
            interval_seconds: 30,
            records_per_interval: 5,
            image_width: 1024,
            image_height: 680,
            font_size: 28,
            output_dir: PathBuf::from("output"),
            font_path: None,
        }
    }
}

impl LiveConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.interval_seconds == 0 {
            return Err(GenerationError::InvalidConfig(
                "interval_seconds must be positive".to_string(),
            ));
        }
        if self.image_width < MIN_IMAGE_SIDE || self.image_height < MIN_IMAGE_SIDE {
            return Err(GenerationError::InvalidConfig(format!(
                "image must be at least {MIN_IMAGE_SIDE}x{MIN_IMAGE_SIDE} pixels"
            )));
        }
        if self.font_size == 0 {
            return Err(GenerationError::InvalidConfig(
                "font_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn schedule(&self) -> ScheduleConfig {
        ScheduleConfig {
            total: Duration::from_secs(self.run_minutes.saturating_mul(60)),
            interval: Duration::from_secs(self.interval_seconds),
            batch_size: self.records_per_interval,
        }
    }

    pub fn photo_style(&self) -> PhotoStyle {
        PhotoStyle {
            width: self.image_width,
            height: self.image_height,
            font_size: self.font_size,
            font_path: self.font_path.clone(),
        }
    }

    pub fn layout(&self) -> LiveLayout {
        LiveLayout::new(&self.output_dir)
    }
}

/// Paths under the live output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveLayout {
    pub root: PathBuf,
    pub csv_path: PathBuf,
    pub photos_dir: PathBuf,
    pub log_path: PathBuf,
}

impl LiveLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            csv_path: root.join("violations.csv"),
            photos_dir: root.join("photos"),
            log_path: root.join("generator.log.jsonl"),
        }
    }

    /// Creates the root and photos directories.
    pub fn ensure(&self) -> Result<(), GenerationError> {
        std::fs::create_dir_all(&self.photos_dir)?;
        Ok(())
    }
}
