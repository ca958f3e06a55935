/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load-time settings. Backed by a settings.json file in the working directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configs {
    pub verbose_mode: bool,
    /// Directory that relative data paths resolve against. Empty means the
    /// directory holding the settings file.
    pub working_directory: String,
    /// Shift negative longitudes by +360 before scaling.
    pub normalize_longitude: bool,
    /// Name of the attribute table dialect, e.g. "germany" or "usa".
    pub dialect: String,
}

impl Default for Configs {
    fn default() -> Configs {
        Configs {
            verbose_mode: false,
            working_directory: String::new(),
            normalize_longitude: false,
            dialect: "germany".to_string(),
        }
    }
}

impl Configs {
    pub fn new() -> Configs {
        Configs::default()
    }

    /// The data directory for settings read from `settings_dir`.
    pub fn working_dir(&self, settings_dir: &Path) -> PathBuf {
        let wd = self.working_directory.trim();
        if wd.is_empty() {
            return settings_dir.to_path_buf();
        }
        // joining an absolute path replaces the base
        settings_dir.join(wd)
    }
}

fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE_NAME)
}

/// Reads the settings file in `dir`. A missing file yields the defaults.
pub fn read_configs(dir: &Path) -> Result<Configs, ConfigError> {
    let path = settings_path(dir);
    match fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Configs::new())
        }
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

pub fn save_configs(dir: &Path, configs: &Configs) -> Result<(), ConfigError> {
    let path = settings_path(dir);
    let configs_json =
        serde_json::to_string_pretty(configs).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
    fs::write(&path, configs_json).map_err(|source| ConfigError::Io { path, source })
}

#[cfg(test)]
mod test {
    use super::{read_configs, save_configs, ConfigError, Configs, SETTINGS_FILE_NAME};
    use std::fs;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let configs = read_configs(dir.path()).unwrap();
        assert_eq!(configs, Configs::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let configs = Configs {
            verbose_mode: true,
            normalize_longitude: true,
            dialect: "usa".to_string(),
            ..Default::default()
        };
        save_configs(dir.path(), &configs).unwrap();
        assert_eq!(read_configs(dir.path()).unwrap(), configs);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE_NAME),
            r#"{ "normalize_longitude": true }"#,
        )
        .unwrap();
        let configs = read_configs(dir.path()).unwrap();
        assert!(configs.normalize_longitude);
        assert_eq!(configs.dialect, "germany");
    }

    #[test]
    fn test_working_dir_resolution() {
        let settings_dir = Path::new("/data/settings");
        let mut configs = Configs::default();
        assert_eq!(configs.working_dir(settings_dir), PathBuf::from("/data/settings"));
        configs.working_directory = "kreise".to_string();
        assert_eq!(
            configs.working_dir(settings_dir),
            PathBuf::from("/data/settings/kreise")
        );
        configs.working_directory = "/srv/shapes".to_string();
        assert_eq!(configs.working_dir(settings_dir), PathBuf::from("/srv/shapes"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "{ not json").unwrap();
        match read_configs(dir.path()) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
