use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::receipt::Receipt;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub orders: u32,
}

/// Per-day receipt totals within `[start, end]`, oldest day first. Days without sales are omitted.
/// Totals saturate at `Decimal::MAX`.
pub fn daily_revenue(receipts: &[Receipt], start: NaiveDate, end: NaiveDate) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, (Decimal, u32)> = BTreeMap::new();

    for receipt in receipts {
        let day = receipt.created_at.date();
        if day < start || day > end {
            continue;
        }
        let entry = days.entry(day).or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(receipt.total);
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(date, (total, orders))| DailyRevenue { date, total, orders })
        .collect()
}
