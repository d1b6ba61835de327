//! Nisab threshold evaluation.
//!
//! The threshold and rate are parameters, not market data: obtaining a current
//! gold price is left to whoever builds the [`ZakatConfig`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{ZakatConfig, DEFAULT_NISAB_VALUE, DEFAULT_ZAKAT_RATE};
use crate::types::ZakatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NisabEvaluation {
    pub nisab_value: Decimal,
    pub zakat_rate: Decimal,
    pub exceeds_nisab: bool,
    /// Currently identical to `exceeds_nisab`. Kept separate because the duty
    /// to pay may later depend on more than the threshold (e.g. Hawl).
    pub zakat_due: bool,
    pub zakat_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NisabEvaluator {
    nisab_value: Decimal,
    zakat_rate: Decimal,
}

impl NisabEvaluator {
    /// Rejects a negative threshold or a rate outside `(0, 1]`, as [`ZakatConfig::validate`] does.
    pub fn new(nisab_value: Decimal, zakat_rate: Decimal) -> Result<Self, ZakatError> {
        Self::from_config(&ZakatConfig { nisab_value, zakat_rate })
    }

    pub fn from_config(config: &ZakatConfig) -> Result<Self, ZakatError> {
        config.validate()?;
        Ok(Self {
            nisab_value: config.nisab_value,
            zakat_rate: config.zakat_rate,
        })
    }

    pub fn nisab_value(&self) -> Decimal {
        self.nisab_value
    }

    pub fn zakat_rate(&self) -> Decimal {
        self.zakat_rate
    }

    /// Compares `zakat_base` against the threshold (inclusive) and prices the due amount.
    pub fn evaluate(&self, zakat_base: Decimal) -> NisabEvaluation {
        let exceeds_nisab = zakat_base >= self.nisab_value;
        let zakat_amount = if exceeds_nisab {
            zakat_base.checked_mul(self.zakat_rate).unwrap_or_else(|| {
                tracing::warn!(%zakat_base, "Zakat amount out of range, saturating");
                zakat_base.saturating_mul(self.zakat_rate)
            })
        } else {
            Decimal::ZERO
        };

        tracing::debug!(
            %zakat_base,
            nisab = %self.nisab_value,
            exceeds_nisab,
            %zakat_amount,
            "Evaluated Nisab threshold"
        );

        NisabEvaluation {
            nisab_value: self.nisab_value,
            zakat_rate: self.zakat_rate,
            exceeds_nisab,
            zakat_due: exceeds_nisab,
            zakat_amount,
        }
    }
}

impl Default for NisabEvaluator {
    fn default() -> Self {
        Self {
            nisab_value: DEFAULT_NISAB_VALUE,
            zakat_rate: DEFAULT_ZAKAT_RATE,
        }
    }
}
