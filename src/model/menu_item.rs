use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "2f1e9c7a-52a4-4d0e-8f6b-2a9d3c1b0e11",
    "name": "Iced milk coffee",
    "price": 29000,
    "category": "Coffee",
    "image": "data/images/iced-milk-coffee.png"
}))]
pub struct MenuItem {
    /// Older files have items without an id; the startup migration fills them in.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}
