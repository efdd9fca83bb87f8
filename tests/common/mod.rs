use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use thaikick_api::middleware::auth::Claims;
use thaikick_api::models::user::UserRole;

pub const TEST_SECRET: &str = "test_secret";

#[allow(dead_code)]
pub fn make_token(user_id: &str, role: UserRole) -> String {
    token_with_expiry(user_id, role, 3600)
}

#[allow(dead_code)]
pub fn expired_token(user_id: &str, role: UserRole) -> String {
    token_with_expiry(user_id, role, -3600)
}

fn token_with_expiry(user_id: &str, role: UserRole, offset_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "fighter@example.com".to_string(),
        exp: (now + offset_secs) as usize,
        iat: now as usize,
        user_id: user_id.to_string(),
        role,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}
