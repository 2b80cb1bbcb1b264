use thiserror::Error;

/// Errors emitted while generating, rendering or persisting records.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("catalogue error: {0}")]
    Catalogue(#[from] challan_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[cfg(feature = "raster")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
