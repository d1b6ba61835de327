//! Result assembly.
//!
//! [`ZakatCalculator`] runs classification, base calculation and Nisab
//! evaluation over one balance sheet and packs everything into a fresh
//! [`ZakatResult`]. Each call recomputes from scratch; nothing is cached.

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::advisory::{Advisory, AdvisoryMode};
use crate::balance_sheet::{BalanceSheet, Bucket, EntityInfo};
use crate::calculator::compute_base;
use crate::classifier::{classify, ClassifiedAccounts};
use crate::config::ZakatConfig;
use crate::nisab::NisabEvaluator;
use crate::traits::AdvisoryProvider;
use crate::types::{CalculationStep, ZakatError};

/// Outcome of one Zakat calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZakatResult {
    pub entity_info: EntityInfo,
    pub classified_accounts: ClassifiedAccounts,
    pub total_zakatable_assets: Decimal,
    pub total_deductible_liabilities: Decimal,
    pub zakat_base: Decimal,
    pub nisab_value: Decimal,
    pub zakat_rate: Decimal,
    pub exceeds_nisab: bool,
    pub zakat_due: bool,
    pub zakat_amount: Decimal,
    /// Serialized as `YYYY-MM-DD`.
    pub calculation_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_advice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_suggestions: Option<String>,
}

impl ZakatResult {
    pub fn with_advisory(mut self, advisory: Advisory) -> Self {
        self.compliance_advice = Some(advisory.compliance_advice);
        self.optimization_suggestions = Some(advisory.optimization_suggestions);
        self
    }

    pub fn has_advisory(&self) -> bool {
        self.compliance_advice.is_some() && self.optimization_suggestions.is_some()
    }

    /// Returns the Zakat amount formatted with 2 decimal places.
    pub fn format_amount(&self) -> String {
        let rounded = self
            .zakat_amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }

    /// Format: "{Entity}: {Payable/Exempt} - Due: {Amount}"
    pub fn summary(&self) -> String {
        let name = match self.entity_info.name.trim() {
            "" => "Entity",
            n => n,
        };
        let status = if self.zakat_due { "Payable" } else { "Exempt" };
        format!("{}: {} - Due: {}", name, status, self.format_amount())
    }

    /// Step-by-step derivation of the amount, one entry per classified line item.
    pub fn trace(&self) -> Vec<CalculationStep> {
        let mut steps = Vec::new();

        for (item, amount) in self.classified_accounts.bucket(Bucket::ZakatableAssets) {
            steps.push(CalculationStep::add(item.label(), *amount));
        }
        steps.push(CalculationStep::result("Total Zakatable Assets", self.total_zakatable_assets));

        for (item, amount) in self.classified_accounts.bucket(Bucket::DeductibleLiabilities) {
            steps.push(CalculationStep::subtract(item.label(), *amount));
        }
        steps.push(CalculationStep::result("Zakat Base", self.zakat_base));
        steps.push(CalculationStep::compare("Nisab Threshold", self.nisab_value));

        if self.exceeds_nisab {
            steps.push(CalculationStep::rate("Zakat Rate", self.zakat_rate));
            steps.push(CalculationStep::result("Zakat Due", self.zakat_amount));
        } else {
            steps.push(CalculationStep::info("Zakat base below Nisab - No Zakat Due"));
        }
        steps
    }

    /// Human-readable explanation built from [`trace`](Self::trace).
    pub fn explain(&self) -> String {
        let trace = self.trace();
        let width = trace
            .iter()
            .map(|step| step.description.len())
            .max()
            .unwrap_or(20)
            .max(20);

        let mut lines = vec![
            format!(
                "Zakat calculation for '{}' (year {}, {}):",
                self.entity_info.name, self.entity_info.zakat_year, self.calculation_date
            ),
            format!("{:-<50}", ""),
        ];
        lines.extend(trace.iter().map(|step| step.render(width)));
        lines.push(format!("{:-<50}", ""));
        lines.push(format!("Status: {}", if self.zakat_due { "PAYABLE" } else { "EXEMPT" }));
        if self.zakat_due {
            lines.push(format!("Amount Due: {}", self.format_amount()));
        }
        lines.join("\n")
    }
}

impl std::fmt::Display for ZakatResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Entity: {} ({})", self.entity_info.name, self.entity_info.registration)?;
        writeln!(f, "Zakat Base: {} | Nisab: {}", self.zakat_base, self.nisab_value)?;
        if self.zakat_due {
            write!(f, "Status: PAYABLE ({} due)", self.format_amount())
        } else {
            write!(f, "Status: EXEMPT")
        }
    }
}

/// Runs the classification, base and Nisab steps with fixed parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZakatCalculator {
    config: ZakatConfig,
    evaluator: NisabEvaluator,
}

impl ZakatCalculator {
    /// Fails with [`ZakatError::Configuration`] if `config` does not validate.
    pub fn new(config: ZakatConfig) -> Result<Self, ZakatError> {
        let evaluator = NisabEvaluator::from_config(&config)?;
        Ok(Self { config, evaluator })
    }

    pub fn config(&self) -> &ZakatConfig {
        &self.config
    }

    /// Calculates with today's (UTC) date as the calculation date.
    pub fn calculate(&self, sheet: &BalanceSheet, entity: &EntityInfo) -> ZakatResult {
        self.calculate_on(sheet, entity, Utc::now().date_naive())
    }

    pub fn calculate_on(&self, sheet: &BalanceSheet, entity: &EntityInfo, date: NaiveDate) -> ZakatResult {
        let classified_accounts = classify(sheet);
        let base = compute_base(&classified_accounts);
        let evaluation = self.evaluator.evaluate(base.zakat_base);

        tracing::info!(
            entity = %entity.name,
            zakat_base = %base.zakat_base,
            zakat_due = evaluation.zakat_due,
            zakat_amount = %evaluation.zakat_amount,
            "Zakat calculated"
        );

        ZakatResult {
            entity_info: entity.clone(),
            classified_accounts,
            total_zakatable_assets: base.total_zakatable_assets,
            total_deductible_liabilities: base.total_deductible_liabilities,
            zakat_base: base.zakat_base,
            nisab_value: evaluation.nisab_value,
            zakat_rate: evaluation.zakat_rate,
            exceeds_nisab: evaluation.exceeds_nisab,
            zakat_due: evaluation.zakat_due,
            zakat_amount: evaluation.zakat_amount,
            calculation_date: date,
            compliance_advice: None,
            optimization_suggestions: None,
        }
    }

    /// Calculates and attaches advice from `provider`, or placeholder text if it fails.
    pub async fn calculate_with_advice(
        &self,
        sheet: &BalanceSheet,
        entity: &EntityInfo,
        provider: &dyn AdvisoryProvider,
    ) -> ZakatResult {
        let result = self.calculate(sheet, entity);
        let advisory = match provider.advise(sheet, &result).await {
            Ok(advisory) => advisory,
            Err(e) => {
                tracing::warn!(error = %e, "Advisory provider failed; using placeholder text");
                Advisory::placeholder()
            }
        };
        result.with_advisory(advisory)
    }

    /// Calculates with advice chosen by `mode`.
    ///
    /// `Remote` without a configured provider behaves like `Static`.
    pub async fn calculate_with_mode(
        &self,
        sheet: &BalanceSheet,
        entity: &EntityInfo,
        mode: AdvisoryMode,
        remote: Option<&dyn AdvisoryProvider>,
    ) -> ZakatResult {
        match (mode, remote) {
            (AdvisoryMode::Remote, Some(provider)) => {
                self.calculate_with_advice(sheet, entity, provider).await
            }
            (AdvisoryMode::Remote, None) => {
                tracing::warn!("No remote advisory provider configured; using placeholder text");
                self.calculate(sheet, entity).with_advisory(Advisory::placeholder())
            }
            (AdvisoryMode::Static, _) => self.calculate(sheet, entity).with_advisory(Advisory::placeholder()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance_sheet::LineItem;
    use rust_decimal_macros::dec;

    struct FailingAdvisor;

    #[async_trait::async_trait]
    impl AdvisoryProvider for FailingAdvisor {
        async fn advise(&self, _: &BalanceSheet, _: &ZakatResult) -> Result<Advisory, ZakatError> {
            Err(ZakatError::Configuration("advisor offline".into()))
        }
    }

    struct EchoAdvisor;

    #[async_trait::async_trait]
    impl AdvisoryProvider for EchoAdvisor {
        async fn advise(&self, _: &BalanceSheet, result: &ZakatResult) -> Result<Advisory, ZakatError> {
            Ok(Advisory::new(format!("base {}", result.zakat_base), "none"))
        }
    }

    fn small_sheet() -> BalanceSheet {
        BalanceSheet::new()
            .with_item(LineItem::CashAndBankBalances, 10_000).unwrap()
            .with_item(LineItem::TradePayables, 2_000).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_assembly_passes_entity_through() {
        let entity = EntityInfo::new("Acme", "R-1", "1446");
        let result = ZakatCalculator::default().calculate_on(&small_sheet(), &entity, date());

        assert_eq!(result.entity_info, entity);
        assert_eq!(result.zakat_base, dec!(8000));
        assert_eq!(result.zakat_amount, dec!(200));
        assert_eq!(result.zakat_due, result.exceeds_nisab);
        assert!(!result.has_advisory());
    }

    #[test]
    fn test_unvalidated_config_rejected() {
        let config = ZakatConfig { nisab_value: dec!(-5950), zakat_rate: dec!(0.025) };
        assert!(matches!(ZakatCalculator::new(config), Err(ZakatError::Configuration(_))));

        let calc = ZakatCalculator::new(ZakatConfig::default()).unwrap();
        assert_eq!(calc.config(), &ZakatConfig::default());
        let result = calc.calculate_on(&BalanceSheet::new(), &EntityInfo::default(), date());
        assert!(!result.zakat_due);
    }

    #[test]
    fn test_serialized_date_format() {
        let result = ZakatCalculator::default().calculate_on(&small_sheet(), &EntityInfo::default(), date());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["calculation_date"], "2025-03-01");
        assert!(json.get("compliance_advice").is_none());
        assert_eq!(json["classified_accounts"]["zakatable_assets"]["Cash and bank balances"].as_f64(), Some(10000.0));
    }

    #[test]
    fn test_explain_payable_and_exempt() {
        let calc = ZakatCalculator::default();
        let payable = calc.calculate_on(&small_sheet(), &EntityInfo::new("Acme", "R-1", "1446"), date());
        let text = payable.explain();
        assert!(text.contains("Cash and bank balances"));
        assert!(text.contains("Status: PAYABLE"));
        assert!(text.contains("Amount Due: 200.00"));

        let exempt = calc.calculate_on(&BalanceSheet::new(), &EntityInfo::default(), date());
        assert!(exempt.explain().contains("INFO: Zakat base below Nisab"));
        assert_eq!(exempt.summary(), "Entity: Exempt - Due: 0.00");
    }

    #[test]
    fn test_trace_follows_outcome() {
        let result = ZakatCalculator::default().calculate_on(&small_sheet(), &EntityInfo::default(), date());
        let trace = result.trace();
        assert_eq!(trace.first().unwrap().description, "Cash and bank balances");
        assert_eq!(trace.last().unwrap().amount, Some(dec!(200)));
    }

    #[tokio::test]
    async fn test_failing_advisor_falls_back_to_placeholder() {
        let result = ZakatCalculator::default()
            .calculate_with_advice(&small_sheet(), &EntityInfo::default(), &FailingAdvisor)
            .await;
        assert_eq!(result.compliance_advice, Some(Advisory::placeholder().compliance_advice));
        assert!(result.has_advisory());
    }

    #[tokio::test]
    async fn test_modes() {
        let calc = ZakatCalculator::default();
        let sheet = small_sheet();
        let entity = EntityInfo::default();

        let remote = calc
            .calculate_with_mode(&sheet, &entity, AdvisoryMode::Remote, Some(&EchoAdvisor))
            .await;
        assert_eq!(remote.compliance_advice.as_deref(), Some("base 8000"));

        let unconfigured = calc.calculate_with_mode(&sheet, &entity, AdvisoryMode::Remote, None).await;
        assert_eq!(unconfigured.optimization_suggestions, Some(Advisory::placeholder().optimization_suggestions));

        let local = calc
            .calculate_with_mode(&sheet, &entity, AdvisoryMode::Static, Some(&EchoAdvisor))
            .await;
        assert_eq!(local.compliance_advice, Some(Advisory::placeholder().compliance_advice));
    }
}
