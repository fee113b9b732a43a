//! Argon2id implementation of the [`PasswordHasher`] port.
//!
//! Hashing and verification run on the blocking pool via
//! [`TraceId::spawn_blocking`] so they never stall the async workers.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PhcError, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PasswordHash, TraceId};

/// Argon2id hasher producing PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

fn hash_blocking(password: &[u8], params: Params) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2PasswordHasher::argon2(params)
        .hash_password(password, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hashing(err.to_string()))
}

fn verify_blocking(password: &[u8], encoded: &str) -> Result<bool, PasswordHashError> {
    let parsed =
        PhcHash::new(encoded).map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
    // Cost parameters come from the PHC string, not from this hasher.
    match Argon2::default().verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(PhcError::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::malformed_hash(err.to_string())),
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let params = self.params.clone();
        let encoded = TraceId::spawn_blocking(move || hash_blocking(&password, params))
            .await
            .map_err(|err| PasswordHashError::hashing(err.to_string()))??;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let encoded = hash.as_str().to_owned();
        TraceId::spawn_blocking(move || verify_blocking(&password, &encoded))
            .await
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?
    }
}
