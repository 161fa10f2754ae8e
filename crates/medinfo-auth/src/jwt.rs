use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use medinfo_core::models::role::Role;

use crate::error::AuthError;

/// Tokens are valid for 24 hours from issue.
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys derived from one shared secret.
///
/// Built once from configuration at startup and carried in application
/// state rather than read from a global.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Issue a token for a user or doctor, valid from now.
pub fn issue_token(keys: &JwtKeys, id: i64, email: &str, role: Role) -> Result<String, AuthError> {
    issue_token_at(keys, id, email, role, jiff::Timestamp::now().as_second())
}

/// Issue a token as if the current time were `issued_at` (unix seconds).
pub fn issue_token_at(
    keys: &JwtKeys,
    id: i64,
    email: &str,
    role: Role,
    issued_at: i64,
) -> Result<String, AuthError> {
    let claims = Claims {
        id,
        email: email.to_string(),
        role,
        iat: issued_at,
        exp: issued_at + TOKEN_LIFETIME_SECS,
    };
    Ok(encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)?)
}

/// Validate signature, algorithm and expiry, and return the claims.
pub fn verify_token(keys: &JwtKeys, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidToken => AuthError::InvalidToken(e.to_string()),
            _ => AuthError::Jwt(e),
        }
    })?;

    Ok(data.claims)
}
