use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

/// Staff account as stored in `users.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    /// argon2 PHC string
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub hourly_rate: Decimal,
}

/// Account as returned over HTTP, without the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "username": "barista1",
    "role": "staff",
    "hourly_rate": 30000
}))]
pub struct UserResponse {
    pub username: String,
    pub role: Role,
    #[schema(value_type = f64)]
    pub hourly_rate: Decimal,
}

impl From<&UserAccount> for UserResponse {
    fn from(user: &UserAccount) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
            hourly_rate: user.hourly_rate,
        }
    }
}
