use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of operation a [`CalculationStep`] represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Initial,
    Add,
    Subtract,
    Compare,
    Rate,
    Result,
    Info,
}

impl Operation {
    fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Rate => "x",
            Operation::Result => "=",
            Operation::Compare => "?",
            Operation::Initial | Operation::Info => " ",
        }
    }
}

/// Represents a single step in the Zakat calculation process.
///
/// A list of steps lets a reader verify how the final amount was derived
/// from the balance sheet, line item by line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationStep {
    /// Human-readable description of what this step does.
    pub description: String,
    /// The value at this step (if applicable).
    pub amount: Option<Decimal>,
    pub operation: Operation,
}

impl CalculationStep {
    fn with(operation: Operation, description: impl Into<String>, amount: Option<Decimal>) -> Self {
        Self {
            description: description.into(),
            amount,
            operation,
        }
    }

    pub fn initial(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Initial, description, Some(amount))
    }

    pub fn add(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Add, description, Some(amount))
    }

    pub fn subtract(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Subtract, description, Some(amount))
    }

    pub fn compare(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Compare, description, Some(amount))
    }

    pub fn rate(description: impl Into<String>, rate: Decimal) -> Self {
        Self::with(Operation::Rate, description, Some(rate))
    }

    pub fn result(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(Operation::Result, description, Some(amount))
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self::with(Operation::Info, description, None)
    }

    /// Renders this step as one aligned line of an explanation table.
    pub(crate) fn render(&self, width: usize) -> String {
        match (self.operation, self.amount) {
            (Operation::Info, _) => format!("  INFO: {}", self.description),
            (Operation::Rate, Some(rate)) => format!(
                "  {:<width$} : {} {:>14.3}",
                self.description,
                self.operation.symbol(),
                rate,
                width = width
            ),
            (_, Some(amount)) => format!(
                "  {:<width$} : {} {:>14.2}",
                self.description,
                self.operation.symbol(),
                amount,
                width = width
            ),
            (_, None) => format!("  {:<width$} : [No Amount]", self.description, width = width),
        }
    }
}

/// Why a single call to a remote collaborator did not produce data.
///
/// Exactly one attempt is made per request; these are never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchFailure {
    #[error("request exceeded its {budget_ms} ms deadline")]
    Timeout { budget_ms: u64 },
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum ZakatError {
    #[error("Invalid Input [{field}]: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Network Error: {0}")]
    Network(#[from] FetchFailure),

    #[error("No sample data available for {0}")]
    SampleUnavailable(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),
}

impl ZakatError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ZakatError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error came from a failed call to a remote service.
    pub fn is_network(&self) -> bool {
        matches!(self, ZakatError::Network(_))
    }
}

impl From<serde_json::Error> for ZakatError {
    fn from(e: serde_json::Error) -> Self {
        ZakatError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trace_serializes_operation_in_camel_case() {
        let steps = vec![
            CalculationStep::initial("Cash and bank balances", dec!(100)),
            CalculationStep::rate("Zakat Rate", dec!(0.025)),
            CalculationStep::info("below nisab"),
        ];
        let json = serde_json::to_string(&steps).unwrap();

        assert!(json.contains(r#""operation":"initial""#));
        assert!(json.contains(r#""operation":"rate""#));
        assert!(json.contains(r#""operation":"info""#));
    }

    #[test]
    fn test_render_step() {
        let line = CalculationStep::subtract("Trade payables", dec!(280000)).render(20);
        assert!(line.contains("Trade payables"));
        assert!(line.contains(" - "));
        assert!(line.ends_with("280000.00"));

        let info = CalculationStep::info("Zakat base below Nisab").render(20);
        assert_eq!(info, "  INFO: Zakat base below Nisab");
    }

    #[test]
    fn test_network_error_from_failure() {
        let err: ZakatError = FetchFailure::Status(503).into();
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Network Error: backend returned status 503");
    }
}
