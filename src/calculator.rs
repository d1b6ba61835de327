use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance_sheet::Bucket;
use crate::classifier::ClassifiedAccounts;

/// Totals derived from classified accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZakatBase {
    pub total_zakatable_assets: Decimal,
    pub total_deductible_liabilities: Decimal,
    /// Zakatable assets minus deductible liabilities. May be negative.
    pub zakat_base: Decimal,
}

/// Reduces classified accounts to the zakat base (net asset method).
///
/// Totals and base saturate at the `Decimal` bounds rather than overflowing.
pub fn compute_base(accounts: &ClassifiedAccounts) -> ZakatBase {
    let total_zakatable_assets = accounts.total(Bucket::ZakatableAssets);
    let total_deductible_liabilities = accounts.total(Bucket::DeductibleLiabilities);

    let zakat_base = total_zakatable_assets
        .checked_sub(total_deductible_liabilities)
        .unwrap_or_else(|| {
            tracing::warn!("Zakat base out of range, saturating");
            total_zakatable_assets.saturating_sub(total_deductible_liabilities)
        });

    ZakatBase {
        total_zakatable_assets,
        total_deductible_liabilities,
        zakat_base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance_sheet::{BalanceSheet, LineItem};
    use crate::classifier::classify;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_is_assets_minus_deductible_liabilities() {
        let sheet = BalanceSheet::new()
            .with_item(LineItem::CashAndBankBalances, 1000).unwrap()
            .with_item(LineItem::Inventory, 500).unwrap()
            .with_item(LineItem::TradePayables, 300).unwrap()
            .with_item(LineItem::LongTermLoans, 10_000).unwrap()
            .with_item(LineItem::PropertyAndEquipment, 50_000).unwrap();

        let base = compute_base(&classify(&sheet));

        assert_eq!(base.total_zakatable_assets, dec!(1500));
        assert_eq!(base.total_deductible_liabilities, dec!(300));
        assert_eq!(base.zakat_base, dec!(1200));
    }

    #[test]
    fn test_base_may_be_negative() {
        let sheet = BalanceSheet::new()
            .with_item(LineItem::CashAndBankBalances, 100).unwrap()
            .with_item(LineItem::ShortTermBorrowings, 900).unwrap();

        let base = compute_base(&classify(&sheet));
        assert_eq!(base.zakat_base, dec!(-800));
    }

    #[test]
    fn test_base_saturates_at_decimal_bounds() {
        let sheet = BalanceSheet::new()
            .with_item(LineItem::CashAndBankBalances, Decimal::MIN).unwrap()
            .with_item(LineItem::ShortTermBorrowings, Decimal::MAX).unwrap();

        let base = compute_base(&classify(&sheet));
        assert_eq!(base.zakat_base, Decimal::MIN);

        let sheet = BalanceSheet::new()
            .with_item(LineItem::CashAndBankBalances, Decimal::MAX).unwrap()
            .with_item(LineItem::TaxPayable, Decimal::MIN).unwrap();
        assert_eq!(compute_base(&classify(&sheet)).zakat_base, Decimal::MAX);
    }

    #[test]
    fn test_fractional_amounts_do_not_drift() {
        let sheet = BalanceSheet::new()
            .with_item(LineItem::CashAndBankBalances, dec!(0.1)).unwrap()
            .with_item(LineItem::TradeReceivables, dec!(0.2)).unwrap()
            .with_item(LineItem::TaxPayable, dec!(0.3)).unwrap();

        let base = compute_base(&classify(&sheet));
        assert_eq!(base.zakat_base, Decimal::ZERO);
    }
}
