//! Commonly used types, re-exported in one place.
//!
//! ```rust
//! use shariah_audit::prelude::*;
//! ```

pub use crate::advisory::{Advisory, AdvisoryMode, StaticAdvisoryProvider};
pub use crate::audit::{AuditResult, IssuesSummary, ServerHealth, Severity, ShariahStandard, Violation};
pub use crate::balance_sheet::{
    BalanceSheet, Bucket, CalculationRequest, EntityInfo, FinancialData, LineItem,
};
pub use crate::calculator::{compute_base, ZakatBase};
pub use crate::classifier::{classify, ClassifiedAccounts};
#[cfg(feature = "remote")]
pub use crate::client::{ApiClient, FetchOutcome};
pub use crate::config::{ClientConfig, ZakatConfig};
pub use crate::inputs::IntoZakatDecimal;
pub use crate::nisab::{NisabEvaluation, NisabEvaluator};
pub use crate::result::{ZakatCalculator, ZakatResult};
pub use crate::samples::{Sample, SampleKind, StaticSampleProvider};
pub use crate::traits::{AdvisoryProvider, SampleProvider};
pub use crate::types::{CalculationStep, FetchFailure, ZakatError};

pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
