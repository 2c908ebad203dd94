//! Error types for mitigation configuration

use thiserror::Error;

/// Errors building a resistance conversion from settings
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("resistance per percent must be positive, got {0}")]
    NonPositiveRatio(f64),

    #[error("cap percent must be in (0, 100), got {0}")]
    CapOutOfRange(f64),

    #[error("half reduction point must be positive, got {0}")]
    NonPositiveHalfPoint(f64),
}
