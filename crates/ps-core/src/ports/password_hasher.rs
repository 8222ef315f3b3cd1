use anyhow::Result;

use crate::secret::SecretString;

/// Produces the fixed-length digest stored as `adminPasswordHash`.
pub trait PasswordHasherPort: Send + Sync {
    fn hash_password(&self, password: &SecretString) -> Result<String>;
}
