use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::model::table::{
    OrderLine, TAKEAWAY_PREFIX, Table, TableId, TableStatus, TakeawayCustomer,
};

pub const TAKEAWAY_NAME: &str = "Takeaway";

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CartLine {
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({
    "customer": { "name": "Lan", "phone": "0901234567", "address": "12 Hang Bac" },
    "cart": { "Espresso": { "price": 25000, "quantity": 2 } }
}))]
pub struct TakeawayOrder {
    #[serde(default)]
    pub customer: CustomerInfo,
    #[serde(default)]
    pub cart: HashMap<String, CartLine>,
}

impl TakeawayOrder {
    fn customer(&self) -> TakeawayCustomer {
        let or = |v: &Option<String>, default: &str| {
            v.clone().unwrap_or_else(|| default.to_string())
        };
        TakeawayCustomer {
            name: or(&self.customer.name, "Online customer"),
            phone: or(&self.customer.phone, "N/A"),
            address: or(&self.customer.address, "N/A"),
        }
    }

    fn lines(&self) -> BTreeMap<String, OrderLine> {
        self.cart
            .iter()
            .map(|(name, line)| {
                (
                    name.clone(),
                    OrderLine {
                        price: line.price.unwrap_or(Decimal::ZERO),
                        quantity: line.quantity.unwrap_or(1),
                    },
                )
            })
            .collect()
    }
}

/// Puts a web order into the first free takeaway slot, creating a new slot
/// when none is free. Returns the slot id.
pub fn place_order(tables: &mut Vec<Table>, order: &TakeawayOrder) -> TableId {
    let customer = order.customer();
    let lines = order.lines();

    if let Some(slot) = tables
        .iter_mut()
        .find(|t| t.id.is_takeaway() && t.status == TableStatus::Ready)
    {
        info!(takeaway_id = %slot.id, "Filling free takeaway slot");
        slot.order = lines;
        slot.customer = Some(customer);
        slot.employee = None;
        slot.status = TableStatus::Pending;
        return slot.id.clone();
    }

    let next = tables
        .iter()
        .filter_map(|t| t.id.takeaway_number())
        .max()
        .unwrap_or(0)
        + 1;
    let id = TableId::Named(format!("{TAKEAWAY_PREFIX}{next}"));
    info!(takeaway_id = %id, "Creating takeaway slot");

    tables.push(Table {
        id: id.clone(),
        name: Some(TAKEAWAY_NAME.to_string()),
        status: TableStatus::Pending,
        order: lines,
        employee: None,
        customer: Some(customer),
    });
    id
}
