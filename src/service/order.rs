use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    menu_item::MenuItem,
    receipt::Receipt,
    table::{OrderLine, Table, TableId, TableStatus},
};

pub const MAX_QUANTITY: u32 = 99;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderError {
    #[error("table not found: {0}")]
    TableNotFound(TableId),

    #[error("menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("item not in order: {0}")]
    LineNotFound(String),

    #[error("order is empty")]
    EmptyOrder,

    #[error("quantity must be between 1 and {MAX_QUANTITY}, got {0}")]
    InvalidQuantity(u32),
}

pub fn find_table<'a>(tables: &'a mut [Table], id: &TableId) -> Result<&'a mut Table, OrderError> {
    tables
        .iter_mut()
        .find(|t| &t.id == id)
        .ok_or_else(|| OrderError::TableNotFound(id.clone()))
}

/// Adds one unit of a menu item. Lines are keyed by item name; an existing
/// line keeps the price it was first ordered at.
pub fn add_item(
    tables: &mut [Table],
    menu: &[MenuItem],
    table_id: &TableId,
    menu_item_id: &str,
) -> Result<Table, OrderError> {
    let item = menu
        .iter()
        .find(|m| m.id == menu_item_id)
        .ok_or_else(|| OrderError::MenuItemNotFound(menu_item_id.to_string()))?;
    let table = find_table(tables, table_id)?;

    match table.order.get_mut(&item.name) {
        Some(line) => {
            if line.quantity >= MAX_QUANTITY {
                return Err(OrderError::InvalidQuantity(line.quantity + 1));
            }
            line.quantity += 1;
        }
        None => {
            table.order.insert(
                item.name.clone(),
                OrderLine {
                    price: item.price,
                    quantity: 1,
                },
            );
        }
    }
    Ok(table.clone())
}

pub fn set_quantity(
    tables: &mut [Table],
    table_id: &TableId,
    item_name: &str,
    quantity: u32,
) -> Result<Table, OrderError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    let table = find_table(tables, table_id)?;
    let line = table
        .order
        .get_mut(item_name)
        .ok_or_else(|| OrderError::LineNotFound(item_name.to_string()))?;
    line.quantity = quantity;
    Ok(table.clone())
}

pub fn remove_item(
    tables: &mut [Table],
    table_id: &TableId,
    item_name: &str,
) -> Result<Table, OrderError> {
    let table = find_table(tables, table_id)?;
    table
        .order
        .remove(item_name)
        .ok_or_else(|| OrderError::LineNotFound(item_name.to_string()))?;
    Ok(table.clone())
}

/// Marks the table as served by `employee`.
pub fn confirm(tables: &mut [Table], table_id: &TableId, employee: &str) -> Result<Table, OrderError> {
    let table = find_table(tables, table_id)?;
    if table.order.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    table.status = TableStatus::Occupied;
    table.employee = Some(employee.to_string());
    Ok(table.clone())
}

/// Settles the bill and frees the table. Takeaway slots go back to `ready`.
pub fn checkout(
    tables: &mut [Table],
    table_id: &TableId,
    now: NaiveDateTime,
) -> Result<Receipt, OrderError> {
    let table = find_table(tables, table_id)?;
    if table.order.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    let receipt = Receipt {
        id: Uuid::new_v4().to_string(),
        table_id: table.id.clone(),
        total: table.total(),
        items: std::mem::take(&mut table.order),
        employee: table.employee.take(),
        created_at: now,
    };

    table.customer = None;
    table.status = if table.id.is_takeaway() {
        TableStatus::Ready
    } else {
        TableStatus::Empty
    };
    Ok(receipt)
}
