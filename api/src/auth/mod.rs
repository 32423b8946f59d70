pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims, Role};

use chrono::{Duration, Utc};
use common::config;
use jsonwebtoken::{EncodingKey, Header, encode, errors::ErrorKind};

/// Generates a JWT and its expiry timestamp (RFC 3339) for a given user.
///
/// Fails with `InvalidToken` when `JWT_DURATION_MINUTES` puts the expiry out of range.
pub fn generate_jwt(
    user_id: &str,
    role: Role,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let expiry = i64::try_from(config::jwt_duration_minutes())
        .ok()
        .and_then(Duration::try_minutes)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or(ErrorKind::InvalidToken)?;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
