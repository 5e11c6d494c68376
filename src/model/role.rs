use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Parttime,
}

impl Role {
    /// Admins are salaried outside this system and never accrue hourly pay.
    pub fn is_hourly(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}
