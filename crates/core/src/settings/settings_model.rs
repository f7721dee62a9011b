use serde::{Deserialize, Serialize};

use crate::constants::{DECIMAL_PRECISION, IRR_MAX_ITERATIONS, IRR_TOLERANCE};
use crate::errors::{Result, ValidationError};

/// Tunables of the analytics calculators.
///
/// Every field falls back to its default when missing, so collaborators may
/// persist only the values they override.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorSettings {
    /// Absolute tolerance on the rate step at which the IRR solver stops.
    pub irr_tolerance: f64,
    pub irr_max_iterations: u32,
    /// Decimal places kept in performance results.
    pub result_precision: u32,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            irr_tolerance: IRR_TOLERANCE,
            irr_max_iterations: IRR_MAX_ITERATIONS,
            result_precision: DECIMAL_PRECISION,
        }
    }
}

impl CalculatorSettings {
    /// Parses and validates settings stored as JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: CalculatorSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.irr_tolerance.is_finite() || self.irr_tolerance <= 0.0 {
            return Err(ValidationError::InvalidInput(format!(
                "irrTolerance must be a positive number, got {}",
                self.irr_tolerance
            ))
            .into());
        }
        if self.irr_max_iterations == 0 {
            return Err(
                ValidationError::InvalidInput("irrMaxIterations must be at least 1".to_string())
                    .into(),
            );
        }
        if self.result_precision > 28 {
            return Err(ValidationError::InvalidInput(format!(
                "resultPrecision cannot exceed 28 decimal places, got {}",
                self.result_precision
            ))
            .into());
        }
        Ok(())
    }
}
