use actix_web::{HttpResponse, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    auth::{auth::AuthUser, password::hash_password},
    error::{AppError, AppResult},
    model::{
        role::Role,
        user::{UserAccount, UserResponse},
    },
    store::DataStore,
};

#[derive(Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "barista1")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
    pub role: Role,
    #[serde(default)]
    #[schema(example = 30000, value_type = f64)]
    pub hourly_rate: Decimal,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateUser {
    /// Leave out to keep the current password
    pub password: Option<String>,
    pub role: Option<Role>,
    #[schema(value_type = Option<f64>)]
    pub hourly_rate: Option<Decimal>,
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

/// Admins are not paid by the hour; their rate is pinned to zero.
fn effective_rate(role: Role, rate: Decimal) -> AppResult<Decimal> {
    if rate.is_sign_negative() {
        return Err(AppError::validation("Hourly rate must be a non-negative number"));
    }
    Ok(if role.is_hourly() { rate } else { Decimal::ZERO })
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn list_users(auth: AuthUser, store: web::Data<DataStore>) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let users: Vec<UserAccount> = store.load()?;
    let data: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(data))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn create_user(
    auth: AuthUser,
    store: web::Data<DataStore>,
    payload: web::Json<CreateUser>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Username and password must not be empty"));
    }
    let hourly_rate = effective_rate(payload.role, payload.hourly_rate)?;
    let password = hash(&payload.password)?;

    let account = UserAccount {
        username: username.to_string(),
        password,
        role: payload.role,
        hourly_rate,
    };

    let created = store.update(|users: &mut Vec<UserAccount>| {
        if users.iter().any(|u| u.username == account.username) {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        let response = UserResponse::from(&account);
        users.push(account);
        Ok(response)
    })?;

    info!(username = %created.username, role = %created.role, "User created");
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{username}",
    params(("username", Path, description = "Username")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn update_user(
    auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<String>,
    body: web::Json<UpdateUser>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let username = path.into_inner();
    let new_password = match body.password.as_deref() {
        Some(p) if !p.is_empty() => Some(hash(p)?),
        _ => None,
    };

    let updated = store.update(|users: &mut Vec<UserAccount>| {
        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let role = body.role.unwrap_or(user.role);
        let rate = body.hourly_rate.unwrap_or(user.hourly_rate);
        user.hourly_rate = effective_rate(role, rate)?;
        user.role = role;
        if let Some(hashed) = new_password {
            user.password = hashed;
        }
        Ok::<_, AppError>(UserResponse::from(&*user))
    })?;

    info!(username = %updated.username, "User updated");
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{username}",
    params(("username", Path, description = "Username")),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn delete_user(
    auth: AuthUser,
    store: web::Data<DataStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let username = path.into_inner();
    store.update(|users: &mut Vec<UserAccount>| {
        let before = users.len();
        users.retain(|u| u.username != username);
        if users.len() == before {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    })?;

    info!(%username, "User deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/// Creates the `admin` account when the store has no admin at all.
pub fn ensure_admin(store: &DataStore, default_password: &str) -> AppResult<bool> {
    store.update(|users: &mut Vec<UserAccount>| {
        if users.iter().any(|u| u.role == Role::Admin) {
            return Ok(false);
        }
        users.push(UserAccount {
            username: "admin".to_string(),
            password: hash(default_password)?,
            role: Role::Admin,
            hourly_rate: Decimal::ZERO,
        });
        Ok(true)
    })
}
