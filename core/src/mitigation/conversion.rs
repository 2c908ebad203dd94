//! Resistance to damage-reduction conversion
//!
//! Every model is monotonic non-decreasing and bounded in `[0, 100)`.
//! Coefficients come from settings; the engine never hardcodes a game table.

use std::fmt;
use std::sync::Arc;

use bulwark_types::ConversionConfig;

use super::ConversionError;

/// Largest percentage any built-in model reports
const MAX_PERCENT: f64 = 99.999_999_999;

/// Pure mapping from total resistance to a damage-reduction percentage
pub trait ResistanceConversion: Send + Sync {
    fn convert(&self, resistance: f64) -> f64;
}

impl<F> ResistanceConversion for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn convert(&self, resistance: f64) -> f64 {
        self(resistance)
    }
}

/// `min(cap, r / ratio)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearConversion {
    resistance_per_percent: f64,
    cap_percent: f64,
}

impl LinearConversion {
    pub fn new(resistance_per_percent: f64, cap_percent: f64) -> Result<Self, ConversionError> {
        if resistance_per_percent.is_nan() || resistance_per_percent <= 0.0 {
            return Err(ConversionError::NonPositiveRatio(resistance_per_percent));
        }
        if cap_percent.is_nan() || cap_percent <= 0.0 || cap_percent >= 100.0 {
            return Err(ConversionError::CapOutOfRange(cap_percent));
        }
        Ok(Self {
            resistance_per_percent,
            cap_percent,
        })
    }
}

impl Default for LinearConversion {
    fn default() -> Self {
        Self {
            resistance_per_percent: 660.0,
            cap_percent: 50.0,
        }
    }
}

impl ResistanceConversion for LinearConversion {
    fn convert(&self, resistance: f64) -> f64 {
        if resistance.is_nan() || resistance <= 0.0 {
            return 0.0;
        }
        (resistance / self.resistance_per_percent).min(self.cap_percent)
    }
}

/// `100 * r / (r + k)`: 50% at `k`, approaches but never reaches 100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiminishingConversion {
    half_reduction_at: f64,
}

impl DiminishingConversion {
    pub fn new(half_reduction_at: f64) -> Result<Self, ConversionError> {
        if half_reduction_at.is_nan() || half_reduction_at <= 0.0 {
            return Err(ConversionError::NonPositiveHalfPoint(half_reduction_at));
        }
        Ok(Self { half_reduction_at })
    }
}

impl ResistanceConversion for DiminishingConversion {
    fn convert(&self, resistance: f64) -> f64 {
        if resistance.is_nan() || resistance <= 0.0 {
            return 0.0;
        }
        if resistance.is_infinite() {
            return MAX_PERCENT;
        }
        // Rounding lands on exactly 100 for huge inputs
        (100.0 * resistance / (resistance + self.half_reduction_at)).min(MAX_PERCENT)
    }
}

/// Shared handle to an injected conversion
#[derive(Clone)]
pub struct Conversion(Arc<dyn ResistanceConversion>);

impl Conversion {
    pub fn new(conversion: impl ResistanceConversion + 'static) -> Self {
        Self(Arc::new(conversion))
    }

    pub fn from_config(config: &ConversionConfig) -> Result<Self, ConversionError> {
        Ok(match *config {
            ConversionConfig::Linear {
                resistance_per_percent,
                cap_percent,
            } => Self::new(LinearConversion::new(resistance_per_percent, cap_percent)?),
            ConversionConfig::Diminishing { half_reduction_at } => {
                Self::new(DiminishingConversion::new(half_reduction_at)?)
            }
        })
    }

    pub fn convert(&self, resistance: f64) -> f64 {
        self.0.convert(resistance)
    }
}

impl Default for Conversion {
    fn default() -> Self {
        Self::new(LinearConversion::default())
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Conversion(..)")
    }
}
