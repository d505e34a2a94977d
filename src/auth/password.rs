use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PasswordError {
    /// Stored digest could not be parsed or names an unsupported scheme.
    #[error("malformed password digest: {0}")]
    HashFormat(password_hash::Error),
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
}

/// Argon2id digest in PHC string format with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            PasswordError::Hash(e)
        })?
        .to_string();
    Ok(hash)
}

/// Returns `Ok(false)` on mismatch; digest comparison is constant-time inside `argon2`.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        PasswordError::HashFormat(e)
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "argon2 verify error");
            Err(PasswordError::HashFormat(e))
        }
    }
}
