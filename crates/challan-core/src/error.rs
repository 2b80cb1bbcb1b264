use thiserror::Error;

/// Core error type shared across challan crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalogue violates internal invariants.
    #[error("invalid catalogue: {0}")]
    InvalidCatalogue(String),
    /// An amount range has its bounds reversed.
    #[error("invalid range: low {low} exceeds high {high}")]
    InvalidRange { low: u32, high: u32 },
}

/// Convenience alias for results returned by challan crates.
pub type Result<T> = std::result::Result<T, Error>;
