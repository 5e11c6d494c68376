use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::model::role::Role;
use crate::models::TokenType;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    /// Validates a bearer access token.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, AppError> {
        let claims =
            verify_token(token, secret).map_err(|_| AppError::unauthorized("Invalid or expired token"))?;
        if claims.token_type != TokenType::Access {
            return Err(AppError::unauthorized("Access token required"));
        }
        Ok(AuthUser {
            username: claims.sub,
            role: claims.role,
        })
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin only"))
        }
    }

    /// Staff may only look at their own data; admins may look at anyone's.
    pub fn require_self_or_admin(&self, username: &str) -> Result<(), AppError> {
        if self.role == Role::Admin || self.username == username {
            Ok(())
        } else {
            Err(AppError::forbidden("Not allowed to access another user's data"))
        }
    }
}

pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // set by auth_middleware on protected scopes
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let token = match bearer_token(req) {
            Some(t) => t,
            None => return ready(Err(AppError::unauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(AppError::Internal(anyhow::anyhow!("Config missing"))));
            }
        };

        ready(AuthUser::from_token(token, &config.jwt_secret))
    }
}
