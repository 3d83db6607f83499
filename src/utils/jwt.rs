use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::errors::AuthError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub exp: i64, // expiration timestamp
}

/// Génère un JWT token pour un utilisateur (HS256, expire dans 24h).
/// La clé secrète vient de la configuration, jamais d'un état global.
pub fn generate_token(user_id: i32, secret: &str) -> Result<String, AuthError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AuthError::TokenCreation("Failed to calculate expiration".to_string()))?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

/// Vérifie et décode un JWT token.
/// Un token expiré et un token invalide sont deux échecs distincts.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_generate_and_verify_token() {
        let user_id = 123;

        let token = generate_token(user_id, SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here", SECRET);
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_token(1, SECRET).unwrap();
        let result = verify_token(&token, "another-secret");
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Token forgé avec une expiration déjà passée (au-delà du leeway de 60s)
        let claims = Claims {
            sub: 1,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        let result = verify_token(&token, SECRET);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }
}
