use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;
use crate::types::ZakatError;

/// Trait for converting various types into `Decimal` for Zakat calculations.
///
/// This trait allows users to pass `i32`, `f64`, `&str`, etc. directly into
/// constructors without needing to wrap them in `dec!()` or `Decimal::from()`.
pub trait IntoZakatDecimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError>;
}

impl IntoZakatDecimal for Decimal {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        Ok(self)
    }
}

macro_rules! impl_into_zakat_decimal_int {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_int!(i32, u32, i64, u64, isize, usize);

macro_rules! impl_into_zakat_decimal_float {
    ($($t:ty),*) => {
        $(
            impl IntoZakatDecimal for $t {
                fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
                    Decimal::from_f64(self as f64)
                        .ok_or_else(|| ZakatError::invalid_input("amount", format!("Invalid float value: {}", self)))
                }
            }
        )*
    };
}

impl_into_zakat_decimal_float!(f32, f64);

impl IntoZakatDecimal for &str {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        parse_decimal(self)
            .ok_or_else(|| ZakatError::invalid_input("amount", format!("Invalid string format: {:?}", self)))
    }
}

impl IntoZakatDecimal for String {
    fn into_zakat_decimal(self) -> Result<Decimal, ZakatError> {
        self.as_str().into_zakat_decimal()
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim().replace(',', "");
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .ok()
}

/// Coerces a raw JSON amount into a `Decimal`.
///
/// Numbers and numeric strings are converted. Anything else (null, booleans,
/// arrays, objects, non-numeric text) is treated as a zero amount and logged,
/// so a partially filled form never aborts a calculation.
pub fn coerce_amount(field: &str, value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) if s.trim().is_empty() => Some(Decimal::ZERO),
        Value::String(s) => parse_decimal(s),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!(field, %value, "Non-numeric amount coerced to zero");
        Decimal::ZERO
    })
}

/// `deserialize_with` hook applying [`coerce_amount`] to a single form field.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount("form amount", &value))
}
