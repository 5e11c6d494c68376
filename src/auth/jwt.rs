use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::model::role::Role;
use crate::models::{Claims, TokenType};

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

fn claims(username: &str, role: Role, ttl: usize, token_type: TokenType) -> Claims {
    Claims {
        sub: username.to_string(),
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type,
    }
}

fn sign(claims: &Claims, secret: &str) -> Result<String, Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn generate_access_token(
    username: &str,
    role: Role,
    secret: &str,
    ttl: usize,
) -> Result<String, Error> {
    sign(&claims(username, role, ttl, TokenType::Access), secret)
}

pub fn generate_refresh_token(
    username: &str,
    role: Role,
    secret: &str,
    ttl: usize,
) -> Result<String, Error> {
    sign(&claims(username, role, ttl, TokenType::Refresh), secret)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
