//! Balance-sheet vocabulary and ingestion.
//!
//! A [`BalanceSheet`] is a loose mapping from line-item label to amount. Only the
//! labels of [`LineItem`] carry meaning for Zakat; anything else is kept so the
//! sheet can be echoed back, but it never reaches a bucket or a total.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::inputs::{coerce_amount, deserialize_amount, IntoZakatDecimal};
use crate::types::ZakatError;

/// The four classification buckets of a balance sheet for Zakat purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    #[strum(serialize = "Zakatable Assets")]
    ZakatableAssets,
    #[strum(serialize = "Non-Zakatable Assets")]
    NonZakatableAssets,
    #[strum(serialize = "Deductible Liabilities")]
    DeductibleLiabilities,
    #[strum(serialize = "Non-Deductible Liabilities")]
    NonDeductibleLiabilities,
}

/// The fixed vocabulary of balance-sheet line items, in statement order.
///
/// Labels are exact strings; `"Cash and bank balances".parse::<LineItem>()`
/// round-trips through [`LineItem::label`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, AsRefStr, IntoStaticStr, EnumString, EnumIter,
)]
pub enum LineItem {
    #[serde(rename = "Cash and bank balances")]
    #[strum(serialize = "Cash and bank balances")]
    CashAndBankBalances,
    #[serde(rename = "Trade receivables")]
    #[strum(serialize = "Trade receivables")]
    TradeReceivables,
    #[serde(rename = "Inventory")]
    #[strum(serialize = "Inventory")]
    Inventory,
    #[serde(rename = "Short-term investments")]
    #[strum(serialize = "Short-term investments")]
    ShortTermInvestments,
    #[serde(rename = "Prepaid expenses")]
    #[strum(serialize = "Prepaid expenses")]
    PrepaidExpenses,
    #[serde(rename = "Property and equipment")]
    #[strum(serialize = "Property and equipment")]
    PropertyAndEquipment,
    #[serde(rename = "Intangible assets")]
    #[strum(serialize = "Intangible assets")]
    IntangibleAssets,
    #[serde(rename = "Long-term investments")]
    #[strum(serialize = "Long-term investments")]
    LongTermInvestments,
    #[serde(rename = "Trade payables")]
    #[strum(serialize = "Trade payables")]
    TradePayables,
    #[serde(rename = "Accrued expenses")]
    #[strum(serialize = "Accrued expenses")]
    AccruedExpenses,
    #[serde(rename = "Short-term borrowings")]
    #[strum(serialize = "Short-term borrowings")]
    ShortTermBorrowings,
    #[serde(rename = "Tax payable")]
    #[strum(serialize = "Tax payable")]
    TaxPayable,
    #[serde(rename = "Long-term loans")]
    #[strum(serialize = "Long-term loans")]
    LongTermLoans,
    #[serde(rename = "Share capital")]
    #[strum(serialize = "Share capital")]
    ShareCapital,
    #[serde(rename = "Retained earnings")]
    #[strum(serialize = "Retained earnings")]
    RetainedEarnings,
}

impl LineItem {
    /// The exact balance-sheet label of this item.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// The bucket this line item is classified into, if any.
    ///
    /// Prepaid expenses and the equity lines map to no bucket.
    pub fn bucket(self) -> Option<Bucket> {
        use LineItem::*;
        match self {
            CashAndBankBalances | TradeReceivables | Inventory | ShortTermInvestments => {
                Some(Bucket::ZakatableAssets)
            }
            PropertyAndEquipment | IntangibleAssets | LongTermInvestments => {
                Some(Bucket::NonZakatableAssets)
            }
            TradePayables | AccruedExpenses | ShortTermBorrowings | TaxPayable => {
                Some(Bucket::DeductibleLiabilities)
            }
            LongTermLoans => Some(Bucket::NonDeductibleLiabilities),
            PrepaidExpenses | ShareCapital | RetainedEarnings => None,
        }
    }

    /// All line items that map to `bucket`, in statement order.
    pub fn in_bucket(bucket: Bucket) -> impl Iterator<Item = LineItem> {
        LineItem::iter().filter(move |item| item.bucket() == Some(bucket))
    }
}

/// A snapshot of balance-sheet amounts keyed by line-item label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Decimal>")]
pub struct BalanceSheet {
    entries: BTreeMap<String, Decimal>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an amount under an arbitrary label.
    pub fn with_entry(
        mut self,
        label: impl Into<String>,
        amount: impl IntoZakatDecimal,
    ) -> Result<Self, ZakatError> {
        let label = label.into();
        let amount = amount
            .into_zakat_decimal()
            .map_err(|e| ZakatError::invalid_input(label.clone(), e.to_string()))?;
        self.entries.insert(label, amount);
        Ok(self)
    }

    /// Adds (or replaces) the amount of a known line item.
    pub fn with_item(self, item: LineItem, amount: impl IntoZakatDecimal) -> Result<Self, ZakatError> {
        self.with_entry(item.label(), amount)
    }

    pub fn insert(&mut self, label: impl Into<String>, amount: Decimal) -> Option<Decimal> {
        self.entries.insert(label.into(), amount)
    }

    /// The amount recorded for `item`, or `None` if the sheet does not carry it.
    pub fn get(&self, item: LineItem) -> Option<Decimal> {
        self.entries.get(item.label()).copied()
    }

    /// The amount recorded for `item`; missing items read as zero.
    pub fn amount(&self, item: LineItem) -> Decimal {
        self.get(item).unwrap_or(Decimal::ZERO)
    }

    /// Labels present in the sheet that are not part of the known vocabulary.
    pub fn unknown_labels(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .filter(|label| label.parse::<LineItem>().is_err())
            .map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, Decimal> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for BalanceSheet {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(label, value)| {
                let amount = coerce_amount(&label, &value);
                (label, amount)
            })
            .collect();
        Self { entries }
    }
}

impl From<BTreeMap<String, Decimal>> for BalanceSheet {
    fn from(entries: BTreeMap<String, Decimal>) -> Self {
        Self { entries }
    }
}

impl From<BalanceSheet> for BTreeMap<String, Decimal> {
    fn from(sheet: BalanceSheet) -> Self {
        sheet.entries
    }
}

impl FromIterator<(LineItem, Decimal)> for BalanceSheet {
    fn from_iter<I: IntoIterator<Item = (LineItem, Decimal)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(item, amount)| (item.label().to_string(), amount))
                .collect(),
        }
    }
}

/// Identifying metadata of the entity being assessed. Carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub name: String,
    pub registration: String,
    pub zakat_year: String,
}

impl EntityInfo {
    pub fn new(
        name: impl Into<String>,
        registration: impl Into<String>,
        zakat_year: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            registration: registration.into(),
            zakat_year: zakat_year.into(),
        }
    }
}

/// Wrapper matching the `financial_data` object of a calculation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub balance_sheet: BalanceSheet,
}

/// The request shape exchanged with the backend's Zakat endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub financial_data: FinancialStatements,
    #[serde(default)]
    pub entity_info: EntityInfo,
}

impl CalculationRequest {
    pub fn new(balance_sheet: BalanceSheet, entity_info: EntityInfo) -> Self {
        Self {
            financial_data: FinancialStatements { balance_sheet },
            entity_info,
        }
    }

    pub fn balance_sheet(&self) -> &BalanceSheet {
        &self.financial_data.balance_sheet
    }
}

impl std::str::FromStr for CalculationRequest {
    type Err = ZakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetFields {
    #[serde(deserialize_with = "deserialize_amount")]
    pub cash: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub receivables: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub inventory: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub short_term_investments: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub prepaid_expenses: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub property_equipment: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub intangible_assets: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub long_term_investments: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiabilityFields {
    #[serde(deserialize_with = "deserialize_amount")]
    pub trade_payables: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub accrued_expenses: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub short_term_borrowings: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub tax_payable: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub long_term_loans: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub share_capital: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub retained_earnings: Decimal,
}

/// Entry-form view of an entity's financial position.
///
/// Field names follow the form (`cash`, `shortTermInvestments`, ...); use
/// [`FinancialData::into_parts`] to get the labelled balance sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialData {
    pub entity_name: String,
    pub registration_number: String,
    pub zakat_year: String,
    pub assets: AssetFields,
    pub liabilities: LiabilityFields,
}

impl FinancialData {
    pub fn balance_sheet(&self) -> BalanceSheet {
        let a = &self.assets;
        let l = &self.liabilities;
        [
            (LineItem::CashAndBankBalances, a.cash),
            (LineItem::TradeReceivables, a.receivables),
            (LineItem::Inventory, a.inventory),
            (LineItem::ShortTermInvestments, a.short_term_investments),
            (LineItem::PrepaidExpenses, a.prepaid_expenses),
            (LineItem::PropertyAndEquipment, a.property_equipment),
            (LineItem::IntangibleAssets, a.intangible_assets),
            (LineItem::LongTermInvestments, a.long_term_investments),
            (LineItem::TradePayables, l.trade_payables),
            (LineItem::AccruedExpenses, l.accrued_expenses),
            (LineItem::ShortTermBorrowings, l.short_term_borrowings),
            (LineItem::TaxPayable, l.tax_payable),
            (LineItem::LongTermLoans, l.long_term_loans),
            (LineItem::ShareCapital, l.share_capital),
            (LineItem::RetainedEarnings, l.retained_earnings),
        ]
        .into_iter()
        .collect()
    }

    pub fn entity_info(&self) -> EntityInfo {
        EntityInfo::new(&self.entity_name, &self.registration_number, &self.zakat_year)
    }

    pub fn into_parts(self) -> (BalanceSheet, EntityInfo) {
        (self.balance_sheet(), self.entity_info())
    }

    pub fn into_request(self) -> CalculationRequest {
        let (sheet, entity) = self.into_parts();
        CalculationRequest::new(sheet, entity)
    }
}

impl FinancialData {
    /// The sample business pre-filled in the entry form.
    pub fn sample() -> Self {
        Self {
            entity_name: "Sample Business LLC".to_string(),
            registration_number: "REG12345".to_string(),
            zakat_year: "2025".to_string(),
            assets: AssetFields {
                cash: Decimal::from(120_000),
                receivables: Decimal::from(350_000),
                inventory: Decimal::from(485_000),
                short_term_investments: Decimal::from(275_000),
                prepaid_expenses: Decimal::from(45_000),
                property_equipment: Decimal::from(1_250_000),
                intangible_assets: Decimal::from(350_000),
                long_term_investments: Decimal::from(500_000),
            },
            liabilities: LiabilityFields {
                trade_payables: Decimal::from(280_000),
                accrued_expenses: Decimal::from(95_000),
                short_term_borrowings: Decimal::from(150_000),
                tax_payable: Decimal::from(75_000),
                long_term_loans: Decimal::from(650_000),
                share_capital: Decimal::from(1_000_000),
                retained_earnings: Decimal::from(725_000),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_labels_round_trip() {
        for item in LineItem::iter() {
            let parsed: LineItem = item.label().parse().unwrap();
            assert_eq!(item.as_ref(), item.label());
            assert_eq!(parsed, item);
        }
        assert_eq!(LineItem::iter().count(), 15);
        assert_eq!(LineItem::ShortTermInvestments.label(), "Short-term investments");
        assert_eq!(LineItem::TaxPayable.to_string(), "Tax payable");
    }

    #[test]
    fn test_bucket_membership() {
        let zakatable: Vec<_> = LineItem::in_bucket(Bucket::ZakatableAssets).collect();
        assert_eq!(
            zakatable,
            vec![
                LineItem::CashAndBankBalances,
                LineItem::TradeReceivables,
                LineItem::Inventory,
                LineItem::ShortTermInvestments,
            ]
        );
        assert_eq!(LineItem::in_bucket(Bucket::NonDeductibleLiabilities).count(), 1);
        assert_eq!(LineItem::PrepaidExpenses.bucket(), None);
        assert_eq!(LineItem::ShareCapital.bucket(), None);
    }

    #[test]
    fn test_missing_item_reads_as_zero() {
        let sheet = BalanceSheet::new().with_item(LineItem::Inventory, 10).unwrap();
        assert_eq!(sheet.get(LineItem::Inventory), Some(dec!(10)));
        assert_eq!(sheet.get(LineItem::TaxPayable), None);
        assert_eq!(sheet.amount(LineItem::TaxPayable), Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_coerces_malformed_amounts() {
        let sheet: BalanceSheet = serde_json::from_value(json!({
            "Cash and bank balances": 120000,
            "Inventory": "485000.50",
            "Trade payables": "unknown",
            "Tax payable": null,
            "Goodwill": 10
        }))
        .unwrap();

        assert_eq!(sheet.amount(LineItem::CashAndBankBalances), dec!(120000));
        assert_eq!(sheet.amount(LineItem::Inventory), dec!(485000.50));
        assert_eq!(sheet.get(LineItem::TradePayables), Some(Decimal::ZERO));
        assert_eq!(sheet.get(LineItem::TaxPayable), Some(Decimal::ZERO));
        assert_eq!(sheet.unknown_labels().collect::<Vec<_>>(), vec!["Goodwill"]);
    }

    #[test]
    fn test_request_shape() {
        let request: CalculationRequest = r#"{
            "financial_data": { "balance_sheet": { "Inventory": 5 } },
            "entity_info": { "name": "Acme", "registration": "R1", "zakat_year": "1446" }
        }"#
        .parse()
        .unwrap();

        assert_eq!(request.balance_sheet().amount(LineItem::Inventory), dec!(5));
        assert_eq!(request.entity_info.zakat_year, "1446");
    }

    #[test]
    fn test_request_without_entity_info() {
        let request: CalculationRequest =
            r#"{ "financial_data": { "balance_sheet": { "Cash and bank balances": 100000 } } }"#
                .parse()
                .unwrap();
        assert_eq!(request.balance_sheet().amount(LineItem::CashAndBankBalances), dec!(100000));
        assert_eq!(request.entity_info, EntityInfo::default());
    }

    #[test]
    fn test_form_defaults_map_to_labels() {
        let (sheet, entity) = FinancialData::sample().into_parts();
        assert_eq!(sheet.len(), 15);
        assert_eq!(sheet.amount(LineItem::CashAndBankBalances), dec!(120000));
        assert_eq!(sheet.amount(LineItem::RetainedEarnings), dec!(725000));
        assert_eq!(entity.name, "Sample Business LLC");
    }

    #[test]
    fn test_form_missing_fields_are_zero() {
        let data: FinancialData = serde_json::from_value(json!({
            "entityName": "Partial Co",
            "assets": { "cash": 10 }
        }))
        .unwrap();
        assert_eq!(data.assets.cash, dec!(10));
        assert_eq!(data.assets.inventory, Decimal::ZERO);
        assert_eq!(data.liabilities.long_term_loans, Decimal::ZERO);
        assert_eq!(data.entity_name, "Partial Co");
        assert!(data.zakat_year.is_empty());
    }

    #[test]
    fn test_form_coerces_malformed_amounts() {
        let data: FinancialData = serde_json::from_value(json!({
            "assets": { "cash": "abc", "inventory": 6000, "receivables": "1,200" },
            "liabilities": { "taxPayable": null, "tradePayables": "" }
        }))
        .unwrap();
        assert_eq!(data.assets.cash, Decimal::ZERO);
        assert_eq!(data.assets.inventory, dec!(6000));
        assert_eq!(data.assets.receivables, dec!(1200));
        assert_eq!(data.liabilities.tax_payable, Decimal::ZERO);
        assert_eq!(data.liabilities.trade_payables, Decimal::ZERO);
    }
}
