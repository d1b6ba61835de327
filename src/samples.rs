//! Canned responses for demo mode and offline use.

use serde::{Deserialize, Serialize};

use crate::audit::{AuditResult, ProductSummary, ServerHealth, Severity, ShariahStandard, SuspiciousClause, Violation};
use crate::traits::SampleProvider;
use crate::types::ZakatError;

const AAOIFI: &str = "AAOIFI (Accounting and Auditing Organization for Islamic Financial Institutions)";

/// What a sample is requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleKind {
    AuditReport,
    /// Standards applicable to a product type.
    ApplicableStandards { product_type: String },
    /// Standards matching a free-text query or clause.
    StandardsSearch { query: String },
    Health,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Sample {
    AuditReport(AuditResult),
    Standards(Vec<ShariahStandard>),
    Health(ServerHealth),
}

impl Sample {
    fn mismatch(expected: &str, got: &Sample) -> ZakatError {
        ZakatError::SampleUnavailable(format!("expected {} sample, provider returned {:?}", expected, got.kind_name()))
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Sample::AuditReport(_) => "audit_report",
            Sample::Standards(_) => "standards",
            Sample::Health(_) => "health",
        }
    }

    pub fn into_audit_report(self) -> Result<AuditResult, ZakatError> {
        match self {
            Sample::AuditReport(report) => Ok(report),
            other => Err(Self::mismatch("audit_report", &other)),
        }
    }

    pub fn into_standards(self) -> Result<Vec<ShariahStandard>, ZakatError> {
        match self {
            Sample::Standards(standards) => Ok(standards),
            other => Err(Self::mismatch("standards", &other)),
        }
    }

    pub fn into_health(self) -> Result<ServerHealth, ZakatError> {
        match self {
            Sample::Health(health) => Ok(health),
            other => Err(Self::mismatch("health", &other)),
        }
    }
}

/// The built-in sample data set (a non-compliant Murabaha contract).
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSampleProvider;

impl SampleProvider for StaticSampleProvider {
    fn provide_sample(&self, kind: &SampleKind) -> Result<Sample, ZakatError> {
        tracing::debug!(?kind, "Serving static sample");
        Ok(match kind {
            SampleKind::AuditReport => Sample::AuditReport(sample_audit_result()),
            SampleKind::ApplicableStandards { .. } => Sample::Standards(sample_standards()),
            SampleKind::StandardsSearch { query } => Sample::Standards(standards_for_clause(query)),
            SampleKind::Health => Sample::Health(ServerHealth::demo()),
        })
    }
}

fn murabaha_standard() -> ShariahStandard {
    ShariahStandard::new(
        "AAOIFI Shariah Standard No. 8: Murabaha",
        "This standard defines the rules for Murabaha transactions where a client requests an institution to purchase an asset that the client promises to buy after the institution acquires it.",
        AAOIFI,
    )
}

fn default_standard() -> ShariahStandard {
    ShariahStandard::new(
        "AAOIFI Shariah Standard No. 3: Default in Payment",
        "This standard covers the rules for handling defaults in payment, including permissible and impermissible penalties.",
        AAOIFI,
    )
}

fn sukuk_standard() -> ShariahStandard {
    ShariahStandard::new(
        "AAOIFI Shariah Standard No. 17: Investment Sukuk",
        "This standard covers the rules for Sukuk (Islamic bonds) which represent common shares in the ownership of assets, usufruct, services, or certain projects.",
        AAOIFI,
    )
}

pub fn sample_standards() -> Vec<ShariahStandard> {
    vec![murabaha_standard(), default_standard(), sukuk_standard()]
}

/// Picks the sample standard relevant to a clause by keyword, case-insensitively.
pub fn standards_for_clause(clause: &str) -> Vec<ShariahStandard> {
    let clause = clause.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| clause.contains(w));

    let standard = if mentions(&["penalty", "default"]) {
        ShariahStandard::new(
            "AAOIFI Shariah Standard No. 3: Default in Payment",
            "Late payment penalties that generate profit for the lender are not permissible. However, penalties directed to charity may be allowed to discourage deliberate default.",
            AAOIFI,
        )
    } else if mentions(&["bond", "liquidity"]) {
        ShariahStandard::new(
            "AAOIFI Shariah Standard No. 17: Investment Sukuk",
            "Conventional bonds are not Shariah-compliant due to their interest-based nature. Sukuk are the Islamic alternative, representing ownership in an underlying asset.",
            AAOIFI,
        )
    } else if mentions(&["murabaha", "profit markup"]) {
        ShariahStandard::new(
            "AAOIFI Shariah Standard No. 8: Murabaha",
            "Murabaha is a sale contract where the seller explicitly declares the cost and profit margin. In Islamic banking, the bank purchases an asset and sells it to the client at a markup.",
            AAOIFI,
        )
    } else {
        ShariahStandard::new(
            "General Shariah Compliance Principles",
            "Islamic finance prohibits interest (riba), excessive uncertainty (gharar), gambling (maysir), and investment in prohibited activities (haram).",
            "General Shariah Principles",
        )
    };
    vec![standard]
}

pub fn sample_audit_result() -> AuditResult {
    const PENALTY_CLAUSE: &str = "An early payment penalty may apply in cases of default.";
    const PENALTY_REASON: &str = "Early payment penalties that generate profit for the lender are not permissible in Shariah. This may constitute Riba (interest).";
    const PENALTY_FIX: &str = "Replace with a clause that directs any penalties to charity, or remove the penalty for early payment entirely.";
    const BOND_CLAUSE: &str = "Liquidity is backed by conventional bonds.";
    const BOND_REASON: &str = "Conventional bonds are interest-based and not Shariah-compliant. They involve Riba which is prohibited.";
    const BOND_FIX: &str = "Replace conventional bonds with Sukuk (Islamic bonds) or other Shariah-compliant investments.";
    const STANDARD_3: &str = "AAOIFI Shariah Standard No. 3";
    const STANDARD_8: &str = "AAOIFI Shariah Standard No. 8";
    const STANDARD_17: &str = "AAOIFI Shariah Standard No. 17";

    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let violation = |clause: &str, category: &str, reason: &str, fix: &str, doc: &str| Violation {
        clause: clause.to_string(),
        category: category.to_string(),
        reason: reason.to_string(),
        suggested_fix: Some(fix.to_string()),
        severity: Severity::High,
        source_doc: Some(doc.to_string()),
        search_results: None,
    };

    let clause = |text: &str, compliant: bool, reason: &str, fix: Option<&str>, doc: &str| SuspiciousClause {
        clause: text.to_string(),
        compliant,
        reason: reason.to_string(),
        suggested_fix: fix.map(str::to_string),
        source_doc: Some(doc.to_string()),
        source_text: None,
    };

    AuditResult {
        overall_compliance: false,
        product_summary: Some(ProductSummary {
            product_type: Some("Murabaha".to_string()),
            contract_type: Some("Deferred Payment Sale".to_string()),
            main_parties: Some(strings(&["Seller", "Buyer"])),
            key_clauses: Some(strings(&[
                "Deferred payment terms with profit markup",
                "Seller retains ownership until full payment",
                "Early payment penalty clause",
                "Liquidity backed by conventional bonds",
            ])),
            financial_terms: Some(strings(&[
                "Profit markup on deferred payment",
                "Early payment penalty",
                "Conventional bonds for liquidity",
            ])),
        }),
        violations: vec![
            violation(PENALTY_CLAUSE, "penalty", PENALTY_REASON, PENALTY_FIX, STANDARD_3),
            violation(BOND_CLAUSE, "investment", BOND_REASON, BOND_FIX, STANDARD_17),
        ],
        suspicious_clauses: vec![
            clause(
                "This Murabaha agreement involves deferred payment terms with added profit markup.",
                true,
                "Murabaha with deferred payment and clearly disclosed profit markup is permissible in Shariah.",
                None,
                STANDARD_8,
            ),
            clause(
                "The seller retains ownership until full payment.",
                true,
                "Retention of ownership until full payment is permissible and protects the seller's rights.",
                None,
                STANDARD_8,
            ),
            clause(PENALTY_CLAUSE, false, PENALTY_REASON, Some(PENALTY_FIX), STANDARD_3),
            clause(BOND_CLAUSE, false, BOND_REASON, Some(BOND_FIX), STANDARD_17),
        ],
    }
}
