//! # shariah-audit
//!
//! Client library for a Shariah compliance audit service, built around a
//! deterministic Zakat engine following AAOIFI FAS 9 (net asset method).
//!
//! The engine classifies balance-sheet line items into four buckets, derives
//! the Zakat base, compares it against the Nisab threshold and applies the
//! rate. Contract audits and standard lookups are delegated to a remote
//! backend; with the `remote` feature the [`client::ApiClient`] talks to it and
//! falls back to bundled sample data when allowed.
//!
//! ```rust
//! use shariah_audit::prelude::*;
//!
//! let sheet: BalanceSheet = [
//!     (LineItem::CashAndBankBalances, dec!(10000)),
//!     (LineItem::TradePayables, dec!(2000)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let result = ZakatCalculator::default().calculate(&sheet, &EntityInfo::default());
//! assert_eq!(result.zakat_amount, dec!(200));
//! ```

pub mod advisory;
pub mod audit;
pub mod balance_sheet;
pub mod calculator;
pub mod classifier;
#[cfg(feature = "remote")]
pub mod client;
pub mod config;
pub mod inputs;
pub mod nisab;
pub mod prelude;
pub mod result;
pub mod samples;
pub mod traits;
pub mod types;

pub use balance_sheet::{BalanceSheet, Bucket, EntityInfo, LineItem};
pub use config::{ClientConfig, ZakatConfig};
pub use result::{ZakatCalculator, ZakatResult};
pub use types::{FetchFailure, ZakatError};
