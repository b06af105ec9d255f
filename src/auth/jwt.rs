//! # JWT Token Management
//!
//! JSON Web Token generation and validation. Validation is stateless:
//! the token carries the username and role, so no directory lookup is
//! needed on authenticated requests.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::user::Role;

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Role name embedded in the token (admin/user/api)
    pub role: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse the embedded role
    pub fn role(&self) -> AuthResult<Role> {
        Role::parse(&self.role)
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing
    pub secret: String,

    /// Access token lifetime in seconds
    pub expires_secs: i64,
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    expires_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Create a new JWT manager with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            expires_secs: config.expires_secs,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate an access token for a username/role pair
    pub fn issue(&self, username: &str, role: Role) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp: now + self.expires_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate an access token and extract claims
    pub fn validate(&self, token: &str) -> AuthResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }

    /// Token lifetime in seconds, echoed in login responses
    pub fn expires_secs(&self) -> i64 {
        self.expires_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret: "test_secret_key_for_testing_only".to_string(),
            expires_secs: 3600,
        })
    }

    #[test]
    fn test_token_round_trip() {
        let manager = create_test_manager();

        let token = manager.issue("admin", Role::Admin).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = manager.validate(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let manager = create_test_manager();

        let result = manager.validate("invalid.token.here");
        assert!(matches!(
            result,
            Err(AuthError::MalformedToken) | Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager1 = JwtManager::new(JwtConfig {
            secret: "secret_one".to_string(),
            expires_secs: 3600,
        });
        let manager2 = JwtManager::new(JwtConfig {
            secret: "secret_two".to_string(),
            expires_secs: 3600,
        });

        let token = manager1.issue("user", Role::User).unwrap();
        let result = manager2.validate(&token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = "test_secret";
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            role: "admin".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &encoding_key).unwrap();

        let manager = JwtManager::new(JwtConfig {
            secret: secret.to_string(),
            expires_secs: 3600,
        });

        let result = manager.validate(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }
}
