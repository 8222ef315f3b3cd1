use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory is unavailable")]
    DataLocalDirUnavailable,

    #[error("system config directory is unavailable")]
    ConfigDirUnavailable,
}
