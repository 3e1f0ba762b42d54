//! Resolution of the local storage root.
//!
//! Precedence: explicit caller path, then the [`ENV_DATA_PATH`] environment
//! variable, then a path persisted in the user config file, then a default
//! directory under the home directory. Resolution never creates directories;
//! the fetch step does that lazily once a download is actually needed.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::DatasetError;

/// Environment variable consulted when no explicit path is given.
pub const ENV_DATA_PATH: &str = "SLEEP_PHYSIONET_PATH";

const CONFIG_DIR: &str = ".sleep-physionet";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_DIR: &str = "sleep_physionet_data";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    data_path: Option<PathBuf>,
}

impl Config {
    fn load(path: &Path) -> Result<Self, DatasetError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn store(&self, path: &Path) -> Result<(), DatasetError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Resolve the storage root, optionally persisting it for future calls.
///
/// `update_path = Some(true)` writes the resolved root into the user config
/// file; `Some(false)` and `None` leave the config untouched.
pub fn data_path(path: Option<&Path>, update_path: Option<bool>) -> Result<PathBuf, DatasetError> {
    let resolved = match path {
        Some(path) => path.to_owned(),
        None => {
            let env = std::env::var_os(ENV_DATA_PATH).map(PathBuf::from);
            let config = Config::load(&config_file()?)?;
            resolve(env.as_deref(), &config)?
        }
    };
    match update_path {
        Some(true) => {
            let config_file = config_file()?;
            Config {
                data_path: Some(resolved.clone()),
            }
            .store(&config_file)?;
            log::debug!(
                "stored data path {} in {}",
                resolved.display(),
                config_file.display()
            );
        }
        Some(false) => {}
        None => log::debug!(
            "using data path {}; pass update_path = Some(true) to persist it",
            resolved.display()
        ),
    }
    Ok(resolved)
}

fn resolve(env: Option<&Path>, config: &Config) -> Result<PathBuf, DatasetError> {
    if let Some(path) = env {
        return Ok(path.to_owned());
    }
    if let Some(path) = &config.data_path {
        return Ok(path.clone());
    }
    Ok(home()?.join(DEFAULT_DIR))
}

fn config_file() -> Result<PathBuf, DatasetError> {
    Ok(home()?.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn home() -> Result<PathBuf, DatasetError> {
    dirs::home_dir().ok_or(DatasetError::NoHomeDir)
}
