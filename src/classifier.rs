//! Balance sheet classification.
//!
//! Partitions the line items of a [`BalanceSheet`] into the four Zakat buckets
//! using the fixed mapping of [`LineItem::bucket`]. Only mapped items count:
//! categories are never inferred for unmapped or unknown labels.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::balance_sheet::{BalanceSheet, Bucket, LineItem};

/// Line items of one bucket, with amounts copied verbatim from the sheet.
pub type BucketEntries = BTreeMap<LineItem, Decimal>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedAccounts {
    pub zakatable_assets: BucketEntries,
    pub non_zakatable_assets: BucketEntries,
    pub deductible_liabilities: BucketEntries,
    pub non_deductible_liabilities: BucketEntries,
}

impl ClassifiedAccounts {
    pub fn bucket(&self, bucket: Bucket) -> &BucketEntries {
        match bucket {
            Bucket::ZakatableAssets => &self.zakatable_assets,
            Bucket::NonZakatableAssets => &self.non_zakatable_assets,
            Bucket::DeductibleLiabilities => &self.deductible_liabilities,
            Bucket::NonDeductibleLiabilities => &self.non_deductible_liabilities,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut BucketEntries {
        match bucket {
            Bucket::ZakatableAssets => &mut self.zakatable_assets,
            Bucket::NonZakatableAssets => &mut self.non_zakatable_assets,
            Bucket::DeductibleLiabilities => &mut self.deductible_liabilities,
            Bucket::NonDeductibleLiabilities => &mut self.non_deductible_liabilities,
        }
    }

    /// Sum of the amounts in `bucket`. Negative entries are not clamped.
    ///
    /// A sum beyond the `Decimal` range saturates at `Decimal::MAX` / `Decimal::MIN`.
    pub fn total(&self, bucket: Bucket) -> Decimal {
        self.bucket(bucket).values().fold(Decimal::ZERO, |acc, amount| {
            acc.checked_add(*amount).unwrap_or_else(|| {
                tracing::warn!(%bucket, "Bucket total out of range, saturating");
                acc.saturating_add(*amount)
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        Bucket::iter().all(|b| self.bucket(b).is_empty())
    }

    /// Iterates over every classified entry together with its bucket.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, LineItem, Decimal)> + '_ {
        Bucket::iter().flat_map(move |b| {
            self.bucket(b).iter().map(move |(item, amount)| (b, *item, *amount))
        })
    }
}

/// Classifies a balance sheet into the four Zakat buckets.
///
/// Known items missing from the sheet are left out of their bucket (they count
/// as zero); nothing is fabricated.
pub fn classify(sheet: &BalanceSheet) -> ClassifiedAccounts {
    let mut accounts = ClassifiedAccounts::default();

    for item in LineItem::iter() {
        let (Some(bucket), Some(amount)) = (item.bucket(), sheet.get(item)) else {
            continue;
        };
        accounts.bucket_mut(bucket).insert(item, amount);
    }

    tracing::debug!(
        zakatable = accounts.zakatable_assets.len(),
        non_zakatable = accounts.non_zakatable_assets.len(),
        deductible = accounts.deductible_liabilities.len(),
        non_deductible = accounts.non_deductible_liabilities.len(),
        ignored = sheet.len() - accounts.iter().count(),
        "Classified balance sheet"
    );

    accounts
}
