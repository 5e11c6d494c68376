use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TAKEAWAY_PREFIX: &str = "takeaway";

/// Dine-in tables are numbered, takeaway slots are named `takeawayN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableId {
    Number(u32),
    Named(String),
}

impl TableId {
    pub fn is_takeaway(&self) -> bool {
        matches!(self, TableId::Named(name) if name.starts_with(TAKEAWAY_PREFIX))
    }

    /// The `N` of `takeawayN`.
    pub fn takeaway_number(&self) -> Option<u32> {
        match self {
            TableId::Named(name) => name.strip_prefix(TAKEAWAY_PREFIX)?.parse().ok(),
            TableId::Number(_) => None,
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableId::Number(n) => write!(f, "{n}"),
            TableId::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for TableId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u32>() {
            Ok(n) => TableId::Number(n),
            Err(_) => TableId::Named(s.to_string()),
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// Dine-in table with no guests.
    Empty,
    /// Order confirmed by staff.
    Occupied,
    /// Takeaway slot free for the next web order.
    Ready,
    /// Web order waiting for staff.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderLine {
    /// Saturates instead of panicking; prices from web orders are not bounded.
    pub fn subtotal(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TakeawayCustomer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 3,
    "status": "occupied",
    "order": { "Espresso": { "price": 25000, "quantity": 2 } },
    "employee": "barista1"
}))]
pub struct Table {
    #[schema(value_type = String)]
    pub id: TableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: TableStatus,
    #[serde(default)]
    pub order: BTreeMap<String, OrderLine>,
    #[serde(default)]
    pub employee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<TakeawayCustomer>,
}

impl Table {
    pub fn dine_in(number: u32) -> Self {
        Self {
            id: TableId::Number(number),
            name: None,
            status: TableStatus::Empty,
            order: BTreeMap::new(),
            employee: None,
            customer: None,
        }
    }

    pub fn total(&self) -> Decimal {
        self.order
            .values()
            .map(OrderLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
