//! # Static User Directory
//!
//! The gateway has no user storage of its own; the handful of accounts
//! that may log in come from configuration as `username:password:role`
//! triples. Plaintext passwords never outlive startup: they are hashed
//! with Argon2id while building the directory and verified against the
//! hash at login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Serialize;

use super::errors::{AuthError, AuthResult};

/// Access role embedded in tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Api,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Api => "api",
        }
    }

    /// Parse a wire name back into a role
    pub fn parse(raw: &str) -> AuthResult<Role> {
        match raw {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "api" => Ok(Role::Api),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// One configured account
#[derive(Debug, Clone)]
pub struct StaticUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// In-memory directory of configured accounts
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<StaticUser>,
}

impl UserDirectory {
    /// Build the directory from a `username:password:role` spec string
    pub fn from_spec(spec: &str) -> AuthResult<Self> {
        let mut users = Vec::new();

        for entry in spec.split(',').filter(|e| !e.trim().is_empty()) {
            let mut parts = entry.trim().splitn(3, ':');
            let (username, password, role) = match (parts.next(), parts.next(), parts.next()) {
                (Some(u), Some(p), Some(r)) if !u.is_empty() && !p.is_empty() => (u, p, r),
                _ => {
                    return Err(AuthError::InvalidUserSpec(format!(
                        "expected username:password:role, got {entry:?}"
                    )))
                }
            };

            users.push(StaticUser {
                username: username.to_string(),
                password_hash: hash_password(password)?,
                role: Role::parse(role)?,
            });
        }

        Ok(Self { users })
    }

    /// Verify credentials; returns the matched account or a generic error
    pub fn verify(&self, username: &str, password: &str) -> AuthResult<&StaticUser> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username)
            .ok_or(AuthError::InvalidCredentials)?;

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Number of configured accounts
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no accounts are configured
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Hash a password using Argon2id
fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| AuthError::HashingFailed)
}

/// Verify a password against a stored Argon2id hash
fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::HashingFailed)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
