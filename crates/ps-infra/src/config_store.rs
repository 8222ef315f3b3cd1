//! File-based setup configuration repository
//!
//! Persists the single setup record as pretty-printed JSON in the application
//! data directory. Every save writes its own uniquely named sibling temporary
//! file, flushes it to disk and renames it over the target, so a concurrent
//! `load` sees either the old record or the new one and overlapping saves never
//! share a temporary file.

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ps_core::ports::{ConfigStoreError, ConfigStorePort};
use ps_core::SetupConfiguration;
use tokio::fs;
use tracing::{debug, warn};

pub const DEFAULT_SETUP_CONFIG_FILE: &str = "setup_config.json";

/// JSON file implementation of [`ConfigStorePort`].
///
/// The repository holds one record at a fixed path. Missing parent directories
/// are created on the first save.
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use ps_infra::FileSetupConfigRepository;
///
/// let repo = FileSetupConfigRepository::with_defaults(PathBuf::from("/var/lib/pos-setup"));
/// assert!(repo.path().ends_with("setup_config.json"));
/// ```
pub struct FileSetupConfigRepository {
    path: PathBuf,
}

impl FileSetupConfigRepository {
    /// Create a repository storing the record at exactly `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Full path of the JSON record file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a repository storing the record as [`DEFAULT_SETUP_CONFIG_FILE`]
    /// inside `base_dir`.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Application data directory
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self {
            path: base_dir.join(DEFAULT_SETUP_CONFIG_FILE),
        }
    }

    /// Location of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(path: &Path, source: std::io::Error) -> ConfigStoreError {
        ConfigStoreError::Persistence {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Prefix of the temporary files, derived from the record file name.
    fn temp_prefix(target: &Path) -> OsString {
        let mut prefix = OsString::from(".");
        prefix.push(target.file_name().unwrap_or(OsStr::new(DEFAULT_SETUP_CONFIG_FILE)));
        prefix.push(".");
        prefix
    }

    /// Write-to-temporary-then-rename. Runs on the blocking pool so that a caller
    /// abandoning the future cannot interrupt the write half way. A temporary file
    /// that is not persisted is removed when it drops.
    async fn atomic_write(&self, content: Vec<u8>) -> Result<(), ConfigStoreError> {
        let target = self.path.clone();
        let task = tokio::task::spawn_blocking(move || -> Result<(), ConfigStoreError> {
            let dir = match target.parent().filter(|d| !d.as_os_str().is_empty()) {
                Some(dir) => dir.to_path_buf(),
                None => PathBuf::from("."),
            };
            std::fs::create_dir_all(&dir).map_err(|e| Self::persistence_error(&dir, e))?;

            let mut tmp = tempfile::Builder::new()
                .prefix(&Self::temp_prefix(&target))
                .suffix(".tmp")
                .tempfile_in(&dir)
                .map_err(|e| Self::persistence_error(&dir, e))?;
            tmp.write_all(&content)
                .map_err(|e| Self::persistence_error(tmp.path(), e))?;
            tmp.as_file()
                .sync_all()
                .map_err(|e| Self::persistence_error(tmp.path(), e))?;

            tmp.persist(&target)
                .map_err(|e| Self::persistence_error(&target, e.error))?;
            Ok(())
        });

        task.await.map_err(|join_err| {
            Self::persistence_error(&self.path, std::io::Error::other(join_err.to_string()))
        })?
    }
}

#[async_trait]
impl ConfigStorePort for FileSetupConfigRepository {
    async fn load(&self) -> Result<Option<SetupConfiguration>, ConfigStoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no setup configuration stored yet");
                return Ok(None);
            }
            Err(e) => return Err(Self::persistence_error(&self.path, e)),
        };

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            warn!(path = %self.path.display(), "setup configuration file is empty");
            return Ok(None);
        }

        let record: SetupConfiguration =
            serde_json::from_slice(&bytes).map_err(|e| ConfigStoreError::Unreadable {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Some(record))
    }

    async fn save(&self, record: &SetupConfiguration) -> Result<(), ConfigStoreError> {
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| ConfigStoreError::Serialization(e.to_string()))?;

        self.atomic_write(json).await?;
        debug!(path = %self.path.display(), "setup configuration saved");
        Ok(())
    }
}
