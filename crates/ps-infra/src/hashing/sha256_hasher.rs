use anyhow::Result;
use ps_core::ports::PasswordHasherPort;
use ps_core::SecretString;
use sha2::{Digest, Sha256};

/// SHA-256 of the UTF-8 password, lowercase hex (64 characters).
pub struct Sha256PasswordHasher;

impl PasswordHasherPort for Sha256PasswordHasher {
    fn hash_password(&self, password: &SecretString) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(password.expose().as_bytes());
        let out = hasher.finalize();
        Ok(hex::encode(out))
    }
}
