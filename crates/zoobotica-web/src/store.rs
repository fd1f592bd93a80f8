//! Versioned on-disk profile: the questionnaire answers and the robot
//! handed to the simulation.
//!
//! Each record is a JSON file wrapped as `{"version": 1, "data": ...}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use zoobotica_core::error::{Result, StorageError};
use zoobotica_core::types::{RobotSnapshot, UserPreferences};

pub const STORE_VERSION: u32 = 1;

const PREFERENCES_FILE: &str = "preferences.json";
const ROBOT_FILE: &str = "robot.json";

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    data: serde_json::Value,
}

/// File-backed profile store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_preferences(&self) -> Result<Option<UserPreferences>> {
        self.load(PREFERENCES_FILE)
    }

    pub fn save_preferences(&self, prefs: &UserPreferences) -> Result<()> {
        self.save(PREFERENCES_FILE, prefs)
    }

    pub fn load_robot(&self) -> Result<Option<RobotSnapshot>> {
        self.load(ROBOT_FILE)
    }

    pub fn save_robot(&self, robot: &RobotSnapshot) -> Result<()> {
        self.save(ROBOT_FILE, robot)
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.dir.join(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let raw: RawEnvelope = serde_json::from_str(&content)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", name, e)))?;
        if raw.version != STORE_VERSION {
            return Err(StorageError::VersionMismatch {
                expected: STORE_VERSION,
                found: raw.version,
            }
            .into());
        }

        let data = serde_json::from_value(raw.data)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", name, e)))?;
        Ok(Some(data))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(&Envelope {
            version: STORE_VERSION,
            data,
        })?;

        let write = || -> std::io::Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            // Write then rename so readers never see a partial file
            let tmp = self.dir.join(format!("{}.tmp", name));
            std::fs::write(&tmp, json.as_bytes())?;
            std::fs::rename(&tmp, self.dir.join(name))
        };
        write().map_err(|e| StorageError::SaveFailed(format!("{}: {}", name, e)))?;

        debug!(file = name, dir = %self.dir.display(), "profile saved");
        Ok(())
    }
}
