//! Mock scene photos for live-mode records.
//!
//! The backend is chosen once by [`select_renderer`]; callers only see the
//! [`PhotoRenderer`] trait.

#[cfg(feature = "raster")]
pub mod raster;
pub mod stub;

use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::info;

use challan_core::ViolationRecord;

use crate::errors::GenerationError;

pub use stub::StubRenderer;

/// Environment override that forces the text-stub backend.
pub const BACKEND_ENV: &str = "CHALLAN_PHOTO_BACKEND";
pub const PHOTO_EXTENSION: &str = "jpg";
pub const STUB_SUFFIX: &str = ".txt";

/// Identifying fields overlaid on a photo.
#[derive(Debug, Clone, Copy)]
pub struct PhotoMeta<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub plate: &'a str,
    pub violation_text: &'a str,
}

impl<'a> PhotoMeta<'a> {
    pub fn from_record(record: &'a ViolationRecord) -> Self {
        Self {
            id: &record.id,
            timestamp: &record.timestamp,
            plate: &record.vehicle_plate,
            violation_text: &record.violation_text,
        }
    }

    pub fn overlay_lines(&self) -> [String; 4] {
        [
            format!("ID: {}", self.id),
            format!("TS: {}", self.timestamp),
            format!("Plate: {}", self.plate),
            format!("Violation: {}", self.violation_text),
        ]
    }

    /// `<photos_dir>/<id>_<safe_ts>.jpg`
    pub fn photo_path(&self, photos_dir: &Path) -> PathBuf {
        photos_dir.join(format!(
            "{}_{}.{PHOTO_EXTENSION}",
            self.id,
            safe_timestamp(self.timestamp)
        ))
    }
}

/// Strips characters that are awkward in file names.
pub fn safe_timestamp(timestamp: &str) -> String {
    timestamp
        .replace(':', "-")
        .replace('+', "_")
        .replace('Z', "")
}

/// Canvas and overlay settings for raster photos.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoStyle {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub font_path: Option<PathBuf>,
}

impl Default for PhotoStyle {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 680,
            font_size: 28,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererBackend {
    Raster,
    Stub,
}

impl RendererBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            RendererBackend::Raster => "raster",
            RendererBackend::Stub => "stub",
        }
    }
}

/// Produces one artifact per record and returns its path.
pub trait PhotoRenderer: Send + Sync {
    fn backend(&self) -> RendererBackend;

    fn render(
        &self,
        meta: &PhotoMeta<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<PathBuf, GenerationError>;
}

/// Checks the raster backend once and returns the renderer to use for the
/// rest of the process.
pub fn select_renderer(photos_dir: &Path, style: &PhotoStyle) -> Box<dyn PhotoRenderer> {
    let forced_stub = std::env::var(BACKEND_ENV)
        .map(|value| value.eq_ignore_ascii_case("stub"))
        .unwrap_or(false);

    let renderer = if forced_stub {
        stub_renderer(photos_dir)
    } else {
        detect_raster(photos_dir, style)
    };
    info!(
        event = "renderer_selected",
        backend = renderer.backend().as_str(),
        forced_stub
    );
    renderer
}

#[cfg(feature = "raster")]
fn detect_raster(photos_dir: &Path, style: &PhotoStyle) -> Box<dyn PhotoRenderer> {
    if raster::encoder_available() {
        Box::new(raster::RasterRenderer::new(photos_dir, style.clone()))
    } else {
        stub_renderer(photos_dir)
    }
}

#[cfg(not(feature = "raster"))]
fn detect_raster(photos_dir: &Path, _style: &PhotoStyle) -> Box<dyn PhotoRenderer> {
    stub_renderer(photos_dir)
}

fn stub_renderer(photos_dir: &Path) -> Box<dyn PhotoRenderer> {
    Box::new(StubRenderer::new(photos_dir))
}
