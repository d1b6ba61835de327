//! Advisory text attached to Zakat results.
//!
//! Commentary normally comes from the backend's text generator. When it is not
//! configured or cannot be reached, fixed placeholder text is used instead so a
//! result that asked for advice always carries some.

use serde::{Deserialize, Serialize};

use crate::balance_sheet::BalanceSheet;
use crate::result::ZakatResult;
use crate::traits::AdvisoryProvider;
use crate::types::ZakatError;

/// Where advisory text for a calculation should come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryMode {
    /// Static placeholder text, no network.
    #[default]
    Static,
    /// Ask the remote collaborator, falling back to placeholder text.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub compliance_advice: String,
    pub optimization_suggestions: String,
}

impl Advisory {
    pub fn new(compliance_advice: impl Into<String>, optimization_suggestions: impl Into<String>) -> Self {
        Self {
            compliance_advice: compliance_advice.into(),
            optimization_suggestions: optimization_suggestions.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_COMPLIANCE_ADVICE, PLACEHOLDER_OPTIMIZATION_SUGGESTIONS)
    }
}

/// Always returns the placeholder text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAdvisoryProvider;

#[async_trait::async_trait]
impl AdvisoryProvider for StaticAdvisoryProvider {
    async fn advise(&self, _sheet: &BalanceSheet, _result: &ZakatResult) -> Result<Advisory, ZakatError> {
        Ok(Advisory::placeholder())
    }
}

pub const PLACEHOLDER_COMPLIANCE_ADVICE: &str = "\
Based on the financial data provided and Zakat calculation results:

1. Compliance Assessment:
   - The calculation follows AAOIFI FAS 9 requirements for classifying zakatable assets and deductible liabilities
   - The net asset method has been correctly applied
   - The Nisab threshold comparison is appropriate

2. Potential Issues:
   - Short-term investments should be further classified to ensure they don't include non-zakatable securities
   - Verify that trade receivables are expected to be collected (doubtful debts may be excluded)

3. Recommendations:
   - Maintain separate accounting records for Zakat throughout the year
   - Consider distributing Zakat on a quarterly basis for more consistent cash flow management
   - Document detailed asset classifications for audit purposes

4. Shariah Considerations:
   - Ensure Zakat is distributed to eligible recipients as specified in Shariah
   - Verify timing of calculation aligns with Islamic calendar
";

pub const PLACEHOLDER_OPTIMIZATION_SUGGESTIONS: &str = "\
Shariah-compliant Zakat optimization strategies:

1. Accelerate Receivable Collection:
   - Collect trade receivables before the Zakat calculation date
   - Converts potentially uncollectible amounts into definite zakatable cash

2. Advance Payment of Short-term Liabilities:
   - Pay outstanding short-term liabilities before the calculation date
   - These are actual business expenses that reduce zakatable wealth

3. Inventory Management:
   - Complete sales of inventory nearing the calculation date
   - Time major inventory purchases after the calculation date

4. Invest in Productive Business Assets:
   - Assets used in production or operations are not zakatable under AAOIFI standards

5. Timing of Zakat Year:
   - Choose a fiscal Zakat year when the business typically holds fewer liquid assets
   - Permissible as long as a full lunar year (Hawl) passes between calculations
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_not_empty() {
        let advisory = Advisory::placeholder();
        assert!(advisory.compliance_advice.contains("AAOIFI FAS 9"));
        assert!(advisory.optimization_suggestions.contains("Hawl"));
    }

    #[test]
    fn test_mode_wire_format() {
        assert_eq!(serde_json::to_string(&AdvisoryMode::Remote).unwrap(), r#""remote""#);
        assert_eq!(AdvisoryMode::default(), AdvisoryMode::Static);
    }
}
