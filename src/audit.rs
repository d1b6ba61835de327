//! Data model of the remote audit collaborator.
//!
//! The backend does the actual contract analysis; these types only mirror its
//! responses, plus the small summaries the report views need.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    #[default]
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub clause: String,
    #[serde(default)]
    pub category: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    /// Absent severities are reported as low.
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspiciousClause {
    pub clause: String,
    pub compliant: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_parties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_clauses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_terms: Option<Vec<String>>,
}

/// Compliance report returned for a submitted contract text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    pub overall_compliance: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_summary: Option<ProductSummary>,
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub suspicious_clauses: Vec<SuspiciousClause>,
}

/// Violation counts by severity and by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesSummary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_category: BTreeMap<String, usize>,
}

impl IssuesSummary {
    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}

impl AuditResult {
    /// True when the backend found no violations.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Uncategorised violations are counted under "other".
    pub fn issues_summary(&self) -> IssuesSummary {
        let mut summary = IssuesSummary {
            total: self.violations.len(),
            ..Default::default()
        };
        for violation in &self.violations {
            *summary.by_severity.entry(violation.severity).or_default() += 1;
            let category = match violation.category.trim() {
                "" => "other",
                c => c,
            };
            *summary.by_category.entry(category.to_string()).or_default() += 1;
        }
        summary
    }

    pub fn compliant_clauses(&self) -> impl Iterator<Item = &SuspiciousClause> {
        self.suspicious_clauses.iter().filter(|c| c.compliant)
    }

    pub fn non_compliant_clauses(&self) -> impl Iterator<Item = &SuspiciousClause> {
        self.suspicious_clauses.iter().filter(|c| !c.compliant)
    }

    pub fn product_type(&self) -> Option<&str> {
        self.product_summary.as_ref()?.product_type.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShariahStandard {
    pub title: String,
    pub summary: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_requirements: Option<Vec<String>>,
}

impl ShariahStandard {
    pub fn new(title: impl Into<String>, summary: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            source: source.into(),
            key_requirements: None,
        }
    }
}

/// Backend status, used to gate search features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerHealth {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_folder: Option<String>,
    #[serde(default)]
    pub search_enabled: bool,
    /// Set by the client, not the backend.
    #[serde(default)]
    pub is_demo_mode: bool,
}

impl ServerHealth {
    pub fn demo() -> Self {
        Self {
            status: "demo".to_string(),
            pdf_folder: None,
            search_enabled: true,
            is_demo_mode: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: "unavailable".to_string(),
            pdf_folder: None,
            search_enabled: false,
            is_demo_mode: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status != "unavailable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn violation(category: &str, severity: Option<&str>) -> serde_json::Value {
        let mut v = json!({ "clause": "c", "category": category, "reason": "r" });
        if let Some(s) = severity {
            v["severity"] = json!(s);
        }
        v
    }

    #[test]
    fn test_issues_summary_defaults() {
        let result: AuditResult = serde_json::from_value(json!({
            "overall_compliance": false,
            "violations": [
                violation("penalty", Some("high")),
                violation("investment", Some("high")),
                violation("penalty", Some("medium")),
                violation("", None),
            ],
            "suspicious_clauses": []
        }))
        .unwrap();

        let summary = result.issues_summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(Severity::High), 2);
        assert_eq!(summary.count(Severity::Medium), 1);
        assert_eq!(summary.count(Severity::Low), 1);
        assert_eq!(summary.by_category["penalty"], 2);
        assert_eq!(summary.by_category["other"], 1);
        assert!(!result.is_clean());
    }

    #[test]
    fn test_minimal_report_parses() {
        let result: AuditResult = serde_json::from_value(json!({ "overall_compliance": true })).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.issues_summary(), IssuesSummary::default());
        assert_eq!(result.product_type(), None);
    }

    #[test]
    fn test_clause_partition() {
        let result: AuditResult = serde_json::from_value(json!({
            "overall_compliance": false,
            "suspicious_clauses": [
                { "clause": "a", "compliant": true, "reason": "ok" },
                { "clause": "b", "compliant": false, "reason": "riba", "suggested_fix": "remove" }
            ]
        }))
        .unwrap();

        assert_eq!(result.compliant_clauses().count(), 1);
        let flagged: Vec<_> = result.non_compliant_clauses().collect();
        assert_eq!(flagged[0].suggested_fix.as_deref(), Some("remove"));
    }

    #[test]
    fn test_severity_wire_format() {
        assert_eq!(serde_json::to_value(Severity::Medium).unwrap(), json!("medium"));
        assert_eq!(Severity::High.to_string(), "high");
    }
}
