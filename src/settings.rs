use std::fs::File;
use std::path::{Path, PathBuf};

use log::*;
use serde::{Deserialize, Serialize};

use shared_types::Settings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub flight: Settings,
}

impl AppSettings {
    pub fn default_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let project_dirs = directories::ProjectDirs::from("edu", "carm", "carm")
            .ok_or("Failed to determine a home directory.")?;
        Ok(project_dirs.config_dir().join("config.json"))
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let f = File::open(path)?;
        let config = serde_json::from_reader(f)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let f = File::create(path)?;
        serde_json::to_writer_pretty(f, self)?;
        Ok(())
    }

    /// Loads `path`, or the file in the user's config directory if none is
    /// given. A missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let path = Self::default_path()?;
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }
}
