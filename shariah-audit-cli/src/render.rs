//! Terminal rendering of results and reports.

use colored::Colorize;
use rust_decimal::{Decimal, RoundingStrategy};
use shariah_audit::audit::{AuditResult, ServerHealth, Severity, ShariahStandard};
use shariah_audit::{Bucket, ZakatResult};
use strum::IntoEnumIterator;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct AmountRow {
    #[tabled(rename = "Line item")]
    item: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct ViolationRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Clause")]
    clause: String,
    #[tabled(rename = "Source")]
    source: String,
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn severity_label(severity: Severity) -> String {
    let label = severity.to_string().to_uppercase();
    match severity {
        Severity::High => label.red().bold().to_string(),
        Severity::Medium => label.yellow().to_string(),
        Severity::Low => label.normal().to_string(),
    }
}

pub fn zakat_report(result: &ZakatResult) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "{} {} ({}), Zakat year {}",
        "Entity:".bold(),
        result.entity_info.name,
        result.entity_info.registration,
        result.entity_info.zakat_year
    ));

    for bucket in Bucket::iter() {
        let entries = result.classified_accounts.bucket(bucket);
        if entries.is_empty() {
            continue;
        }
        let mut rows: Vec<AmountRow> = entries
            .iter()
            .map(|(item, amount)| AmountRow {
                item: item.to_string(),
                amount: money(*amount),
            })
            .collect();
        rows.push(AmountRow {
            item: "Total".to_string(),
            amount: money(result.classified_accounts.total(bucket)),
        });

        out.push(String::new());
        out.push(bucket.to_string().cyan().bold().to_string());
        out.push(Table::new(rows).with(Style::rounded()).to_string());
    }

    out.push(String::new());
    out.push(format!("Total zakatable assets:       {:>16}", money(result.total_zakatable_assets)));
    out.push(format!("Total deductible liabilities: {:>16}", money(result.total_deductible_liabilities)));
    out.push(format!("Zakat base:                   {:>16}", money(result.zakat_base)));
    out.push(format!("Nisab threshold:              {:>16}", money(result.nisab_value)));
    let rate = (result.zakat_rate * Decimal::ONE_HUNDRED).normalize().to_string();
    out.push(format!("Zakat rate:                   {:>15}%", rate));

    let status = if result.zakat_due {
        format!("PAYABLE: {}", result.format_amount()).green().bold()
    } else {
        "EXEMPT: below Nisab".yellow().bold()
    };
    out.push(format!("{} {}", "Status:".bold(), status));
    out.push(format!("Calculated on {}", result.calculation_date));

    if let Some(advice) = &result.compliance_advice {
        out.push(String::new());
        out.push("Compliance advice".cyan().bold().to_string());
        out.push(advice.trim_end().to_string());
    }
    if let Some(suggestions) = &result.optimization_suggestions {
        out.push(String::new());
        out.push("Optimization suggestions".cyan().bold().to_string());
        out.push(suggestions.trim_end().to_string());
    }

    out.join("\n")
}

pub fn audit_report(report: &AuditResult) -> String {
    let mut out = Vec::new();

    let verdict = if report.overall_compliance {
        "COMPLIANT".green().bold()
    } else {
        "NON-COMPLIANT".red().bold()
    };
    out.push(format!("{} {}", "Overall:".bold(), verdict));

    if let Some(summary) = &report.product_summary {
        if let Some(product_type) = &summary.product_type {
            out.push(format!("Product type:  {}", product_type));
        }
        if let Some(contract_type) = &summary.contract_type {
            out.push(format!("Contract type: {}", contract_type));
        }
        if let Some(parties) = &summary.main_parties {
            out.push(format!("Parties:       {}", parties.join(", ")));
        }
    }

    let issues = report.issues_summary();
    out.push(format!(
        "Issues: {} total ({} high, {} medium, {} low)",
        issues.total,
        issues.count(Severity::High),
        issues.count(Severity::Medium),
        issues.count(Severity::Low)
    ));

    if !report.violations.is_empty() {
        let rows: Vec<ViolationRow> = report
            .violations
            .iter()
            .map(|v| ViolationRow {
                severity: severity_label(v.severity),
                category: v.category.clone(),
                clause: v.clause.clone(),
                source: v.source_doc.clone().unwrap_or_default(),
            })
            .collect();
        out.push(Table::new(rows).with(Style::rounded()).to_string());

        for v in &report.violations {
            if let Some(fix) = &v.suggested_fix {
                out.push(format!("  {} {}", "Fix:".bold(), fix));
            }
        }
    }

    let compliant = report.compliant_clauses().count();
    let flagged = report.non_compliant_clauses().count();
    out.push(format!("Clauses reviewed: {} compliant, {} flagged", compliant, flagged));

    out.join("\n")
}

pub fn standards_list(standards: &[ShariahStandard]) -> String {
    if standards.is_empty() {
        return "No matching standards.".to_string();
    }

    let mut out = Vec::new();
    for standard in standards {
        out.push(standard.title.bold().to_string());
        out.push(format!("  {}", standard.summary));
        out.push(format!("  Source: {}", standard.source));
        for requirement in standard.key_requirements.iter().flatten() {
            out.push(format!("  - {}", requirement));
        }
    }
    out.join("\n")
}

pub fn health_line(health: &ServerHealth) -> String {
    let status = match (health.is_available(), health.is_demo_mode) {
        (false, _) => health.status.red().bold(),
        (true, true) => health.status.yellow().bold(),
        (true, false) => health.status.green().bold(),
    };
    let search = if health.search_enabled { "enabled" } else { "disabled" };
    let mut line = format!("Backend: {} | search {}", status, search);
    if health.is_demo_mode {
        line.push_str(" | demo mode (sample data)");
    }
    if let Some(folder) = &health.pdf_folder {
        line.push_str(&format!(" | standards folder {}", folder));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use shariah_audit::advisory::Advisory;
    use shariah_audit::balance_sheet::FinancialData;
    use shariah_audit::samples::sample_audit_result;
    use shariah_audit::ZakatCalculator;

    fn sample_result() -> ZakatResult {
        let (sheet, entity) = FinancialData::sample().into_parts();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        ZakatCalculator::default().calculate_on(&sheet, &entity, date)
    }

    #[test]
    fn test_zakat_report_lists_buckets_and_status() {
        let text = zakat_report(&sample_result());
        assert!(text.contains("Cash and bank balances"));
        assert!(text.contains("1230000.00"));
        assert!(text.contains("PAYABLE: 15750.00"));
        assert!(text.contains("2.5%"));
        assert!(!text.contains("Compliance advice"));
    }

    #[test]
    fn test_zakat_report_bucket_order() {
        let text = zakat_report(&sample_result());
        let positions: Vec<usize> = Bucket::iter()
            .map(|bucket| text.find(&bucket.to_string()).unwrap())
            .collect();
        assert_eq!(positions.len(), 4);
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_zakat_report_includes_advice() {
        let result = sample_result().with_advisory(Advisory::new("Keep records.", "Pay early."));
        let text = zakat_report(&result);
        assert!(text.contains("Keep records."));
        assert!(text.contains("Pay early."));
    }

    #[test]
    fn test_money_rounds_to_cents() {
        assert_eq!(money(dec!(148.755)), "148.76");
        assert_eq!(money(dec!(0)), "0.00");
    }

    #[test]
    fn test_audit_report_counts() {
        let text = audit_report(&sample_audit_result());
        assert!(text.contains("NON-COMPLIANT"));
        assert!(text.contains("2 total (2 high, 0 medium, 0 low)"));
        assert!(text.contains("2 compliant, 2 flagged"));
    }

    #[test]
    fn test_health_line_demo() {
        let text = health_line(&ServerHealth::demo());
        assert!(text.contains("demo mode"));
        assert!(health_line(&ServerHealth::unavailable()).contains("search disabled"));
    }

    #[test]
    fn test_empty_standards() {
        assert_eq!(standards_list(&[]), "No matching standards.");
    }
}
