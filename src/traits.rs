use crate::advisory::Advisory;
use crate::balance_sheet::BalanceSheet;
use crate::result::ZakatResult;
use crate::samples::{Sample, SampleKind};
use crate::types::ZakatError;

/// Source of canned responses used when a remote call fails and fallback is allowed.
///
/// Production code ships [`StaticSampleProvider`](crate::samples::StaticSampleProvider);
/// tests can substitute their own data without touching call sites.
pub trait SampleProvider: Send + Sync {
    fn provide_sample(&self, kind: &SampleKind) -> Result<Sample, ZakatError>;
}

/// Supplier of human-readable commentary on a finished Zakat calculation.
///
/// Implementations may suspend (remote text generation); callers bound them
/// with a deadline and fall back to placeholder text on failure.
#[async_trait::async_trait]
pub trait AdvisoryProvider: Send + Sync {
    async fn advise(&self, sheet: &BalanceSheet, result: &ZakatResult) -> Result<Advisory, ZakatError>;
}
