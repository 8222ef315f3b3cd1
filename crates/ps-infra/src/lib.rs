pub mod config_store;
pub mod hashing;

pub use config_store::{FileSetupConfigRepository, DEFAULT_SETUP_CONFIG_FILE};
pub use hashing::Sha256PasswordHasher;
