use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::error::AppError;
use crate::models::Claims;

/// Decodes the backend's bearer token.
///
/// With a `secret` the HMAC signature is verified; without one the payload is
/// only read, which is enough to route the user and to forward the token to
/// the backend that actually enforces it. Expiry is checked either way.
pub fn decode_claims(token: &str, secret: Option<&str>) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    let key = match secret {
        Some(secret) => DecodingKey::from_secret(secret.as_bytes()),
        None => {
            validation.insecure_disable_signature_validation();
            DecodingKey::from_secret(&[])
        }
    };

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid or expired token: {e}")))
}
