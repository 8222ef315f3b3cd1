use std::path::PathBuf;

use ps_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "pos-setup";

/// Environment variable selecting an isolated profile directory.
pub const PROFILE_ENV: &str = "POS_SETUP_PROFILE";

fn resolved_app_dir_name() -> String {
    match std::env::var(PROFILE_ENV) {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// [`AppDirsPort`] backed by the `dirs` crate.
///
/// Directories are named `pos-setup`, or `pos-setup-<profile>` when
/// [`PROFILE_ENV`] is set.
///
/// # Examples
///
/// ```no_run
/// use ps_core::ports::AppDirsPort;
/// use ps_platform::app_dirs::DirsAppDirsAdapter;
///
/// let dirs = DirsAppDirsAdapter::new().get_app_dirs().unwrap();
/// println!("record lives under {}", dirs.app_data_root.display());
/// ```
pub struct DirsAppDirsAdapter {
    base_dir_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_dir_override: None,
        }
    }

    /// Adapter rooted at `base` for both data and config directories.
    #[cfg(test)]
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            base_dir_override: Some(base),
        }
    }

    /// Overridden base directory, or the system data-local directory.
    pub fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }

    fn base_config_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_dir_override {
            return Some(base.clone());
        }
        dirs::config_dir()
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        let base_config = self
            .base_config_dir()
            .ok_or(AppDirsError::ConfigDirUnavailable)?;
        let app_dir_name = resolved_app_dir_name();

        Ok(AppDirs {
            app_data_root: base_data.join(&app_dir_name),
            app_config_root: base_config.join(&app_dir_name),
        })
    }
}
