use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, info, instrument};

use crate::{
    auth::{
        auth::bearer_token,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::verify_password,
        revocation::RevokedTokens,
    },
    config::Config,
    error::{AppError, AppResult},
    model::{role::Role, user::UserAccount},
    models::{LoginReqDto, TokenPair, TokenType},
    store::DataStore,
};

fn issue_tokens(username: &str, role: Role, config: &Config) -> AppResult<TokenPair> {
    let access_token = generate_access_token(
        username,
        role,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    let refresh_token = generate_refresh_token(
        username,
        role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = TokenPair),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<DataStore>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(AppError::validation("Username or password required"));
    }

    let users: Vec<UserAccount> = store.load()?;
    let account = match users.iter().find(|u| u.username == user.username) {
        Some(account) => account,
        None => {
            info!("Invalid credentials: user not found");
            return Err(AppError::unauthorized("Invalid credentials"));
        }
    };

    if let Err(e) = verify_password(&user.password, &account.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    debug!("Password verified, issuing tokens");
    let tokens = issue_tokens(&account.username, account.role, &config)?;

    info!(role = %account.role, "Login successful");
    Ok(HttpResponse::Ok().json(tokens))
}

/// Exchange a refresh token for a new token pair. The old refresh token is revoked.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Missing, invalid or revoked refresh token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn refresh_token(
    req: HttpRequest,
    store: web::Data<DataStore>,
    config: web::Data<Config>,
    revoked: web::Data<RevokedTokens>,
) -> AppResult<HttpResponse> {
    let token = bearer_token(&req).ok_or_else(|| AppError::unauthorized("No token"))?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|_| AppError::unauthorized("Invalid token"))?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::unauthorized("Refresh token required"));
    }
    if revoked.is_revoked(&claims.jti).await {
        info!(username = %claims.sub, "Rejected revoked refresh token");
        return Err(AppError::unauthorized("Token revoked"));
    }

    // role may have changed, or the account may be gone
    let users: Vec<UserAccount> = store.load()?;
    let account = users
        .iter()
        .find(|u| u.username == claims.sub)
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

    revoked.revoke(&claims.jti).await;
    let tokens = issue_tokens(&account.username, account.role, &config)?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// Logout: revokes the presented refresh token. Always answers 204.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    config: web::Data<Config>,
    revoked: web::Data<RevokedTokens>,
) -> HttpResponse {
    let claims = match bearer_token(&req).map(|t| verify_token(t, &config.jwt_secret)) {
        Some(Ok(c)) => c,
        _ => return HttpResponse::NoContent().finish(),
    };

    // only refresh tokens can logout
    if claims.token_type == TokenType::Refresh {
        revoked.revoke(&claims.jti).await;
        info!(username = %claims.sub, "Logged out");
    }

    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use actix_web::{App, http::StatusCode, test};
    use rust_decimal::Decimal;

    fn seeded_store(dir: &std::path::Path) -> DataStore {
        let store = DataStore::open(dir).unwrap();
        store
            .save(&[UserAccount {
                username: "an".into(),
                password: hash_password("123").unwrap(),
                role: Role::Staff,
                hourly_rate: Decimal::from(30_000),
            }])
            .unwrap();
        store
    }

    #[actix_web::test]
    async fn login_refresh_logout_flow() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_tests();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(seeded_store(dir.path())))
                .app_data(web::Data::new(RevokedTokens::new(config.refresh_token_ttl)))
                .app_data(web::Data::new(config))
                .route("/auth/login", web::post().to(login))
                .route("/auth/refresh", web::post().to(refresh_token))
                .route("/auth/logout", web::post().to(logout)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(serde_json::json!({"username": "an", "password": "123"}))
            .to_request();
        let tokens: TokenPair = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(("Authorization", format!("Bearer {}", tokens.refresh_token)))
            .to_request();
        let rotated: TokenPair = test::call_and_read_body_json(&app, req).await;

        // the first refresh token was rotated out
        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(("Authorization", format!("Bearer {}", tokens.refresh_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header(("Authorization", format!("Bearer {}", rotated.refresh_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(("Authorization", format!("Bearer {}", rotated.refresh_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(seeded_store(dir.path())))
                .app_data(web::Data::new(Config::for_tests()))
                .route("/auth/login", web::post().to(login)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(serde_json::json!({"username": "an", "password": "nope"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
