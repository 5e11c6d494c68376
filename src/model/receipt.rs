use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::table::{OrderLine, TableId};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Receipt {
    pub id: String,
    #[schema(value_type = String)]
    pub table_id: TableId,
    pub items: BTreeMap<String, OrderLine>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub employee: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}
