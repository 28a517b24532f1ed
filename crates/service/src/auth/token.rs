use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{Caller, Role, UserAccount};
use super::errors::AuthError;

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sid: String,
    pub email: String,
    /// Role code.
    pub rol: i32,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn issue(&self, account: &UserAccount) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sid: account.codigo_usuario.to_string(),
            email: account.email.clone(),
            rol: account.codigo_rol,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| AuthError::TokenError(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Caller, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|_| AuthError::Unauthorized("Token inválido o expirado".into()))?;
        let claims = data.claims;
        let codigo_usuario = claims
            .sid
            .parse::<i32>()
            .map_err(|_| AuthError::Unauthorized("Error en obtener el codigo del usuario actual".into()))?;
        let role = Role::from_code(claims.rol)
            .ok_or_else(|| AuthError::Unauthorized("Rol desconocido en el token".into()))?;
        Ok(Caller { codigo_usuario, email: claims.email, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount {
            codigo_usuario: 42,
            email: "tutor@voltapets.cl".into(),
            password_hash: String::new(),
            password_algorithm: "argon2".into(),
            codigo_rol: 3,
        }
    }

    #[test]
    fn issued_token_identifies_caller() {
        let issuer = TokenIssuer::new("0123456789abcdef-secret", 7);
        let token = issuer.issue(&account()).unwrap();
        let caller = issuer.verify(&token).unwrap();
        assert_eq!(caller.codigo_usuario, 42);
        assert_eq!(caller.role, Role::Tutor);
        assert_eq!(caller.email, "tutor@voltapets.cl");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenIssuer::new("0123456789abcdef-one", 7).issue(&account()).unwrap();
        let err = TokenIssuer::new("0123456789abcdef-two", 7).verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "0123456789abcdef-secret";
        let past = Utc::now() - Duration::days(2);
        let claims = Claims {
            sid: "42".into(),
            email: "tutor@voltapets.cl".into(),
            rol: 3,
            jti: Uuid::new_v4().to_string(),
            iat: (past - Duration::days(7)).timestamp(),
            exp: past.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap();
        assert!(TokenIssuer::new(secret, 7).verify(&token).is_err());
    }
}
