//! Password auth service: registration, login, and credential hashing.
//!
//! DESIGN
//! ======
//! Emails are normalized (trimmed, lowercased) before every lookup so the
//! same address always maps to one account. Passwords are hashed with
//! Argon2id over a random 16-byte salt and stored as a PHC string, so the
//! algorithm, parameters and salt travel with the hash.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::store::{self, Store, StoreError, Theme, UserRecord};

const SALT_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("Email is already registered.")]
    EmailTaken,
    #[error("User not found.")]
    UnknownUser,
    #[error("Incorrect password.")]
    WrongPassword,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User as returned to clients. Has no password field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub theme: Theme,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<UserRecord> for PublicUser {
    fn from(user: UserRecord) -> Self {
        Self { id: user.id, name: user.name, email: user.email, theme: user.theme, created_at: user.created_at }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

/// Hash a password with a fresh random salt into a PHC string.
///
/// # Errors
///
/// `Hash` if Argon2 rejects the salt or parameters.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt: [u8; SALT_LEN] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt).map_err(|e| AuthError::Hash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash. Malformed hashes never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create an account.
///
/// # Errors
///
/// `Invalid` for a blank name, malformed email, or empty password;
/// `EmailTaken` if the normalized email already has an account;
/// `Hash` if the password cannot be hashed.
pub async fn register(store: &dyn Store, input: RegisterInput) -> Result<(), AuthError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AuthError::Invalid("Name is required."));
    }
    let email = normalize_email(&input.email).ok_or(AuthError::Invalid("A valid email is required."))?;
    if input.password.is_empty() {
        return Err(AuthError::Invalid("Password is required."));
    }

    let user = UserRecord {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        email,
        password_hash: hash_password(&input.password)?,
        theme: Theme::default(),
        created_at: store::now(),
    };
    match store.insert_user(&user).await {
        Ok(()) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(())
        }
        Err(StoreError::Duplicate(_)) => Err(AuthError::EmailTaken),
        Err(e) => Err(e.into()),
    }
}

/// Check credentials and return the user without its password hash.
///
/// # Errors
///
/// `UnknownUser` if no account has the email, `WrongPassword` on mismatch.
pub async fn login(store: &dyn Store, input: LoginInput) -> Result<PublicUser, AuthError> {
    let email = normalize_email(&input.email).ok_or(AuthError::UnknownUser)?;
    let user = store.find_user(&email).await?.ok_or(AuthError::UnknownUser)?;
    if !verify_password(&input.password, &user.password_hash) {
        return Err(AuthError::WrongPassword);
    }
    info!(user_id = %user.id, "user logged in");
    Ok(user.into())
}
