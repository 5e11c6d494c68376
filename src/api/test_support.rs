use crate::auth::jwt::generate_access_token;
use crate::config::Config;
use crate::model::role::Role;

pub fn test_config() -> Config {
    Config::for_tests()
}

/// `Authorization` header value for a freshly signed access token.
pub fn bearer(username: &str, role: Role) -> String {
    let config = test_config();
    let token = generate_access_token(username, role, &config.jwt_secret, 60).unwrap();
    format!("Bearer {token}")
}
