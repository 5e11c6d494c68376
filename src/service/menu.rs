use std::collections::BTreeSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::model::menu_item::MenuItem;

/// Gives every item without an id a fresh uuid. Returns how many were changed.
pub fn assign_missing_ids(menu: &mut [MenuItem]) -> usize {
    let mut changed = 0;
    for item in menu.iter_mut().filter(|m| m.id.trim().is_empty()) {
        item.id = Uuid::new_v4().to_string();
        changed += 1;
    }
    changed
}

pub fn categories(menu: &[MenuItem]) -> Vec<String> {
    menu.iter()
        .map(|m| m.category.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn validate_item(name: &str, price: Decimal) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Item name must not be empty");
    }
    if price.is_sign_negative() {
        return Err("Price must be a non-negative number");
    }
    Ok(())
}
