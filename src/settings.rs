use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DaftarError, Result};

pub const DB_FILE: &str = "daftar.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    /// Name of the person running the tool; threaded into reconciliation
    /// notes, never read ambiently by the aggregation code.
    #[serde(default)]
    pub current_user: String,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = home().join("Documents").join("daftar");
        Self {
            data_dir: data_dir.to_string_lossy().to_string(),
            current_user: String::new(),
        }
    }
}

impl Settings {
    /// Read `~/.config/daftar/settings.json`, falling back to defaults when
    /// the file is missing or unreadable.
    pub fn load() -> Self {
        match std::fs::read_to_string(settings_path()) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(config_dir())?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DaftarError::Settings(e.to_string()))?;
        std::fs::write(settings_path(), format!("{json}\n"))?;
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join(DB_FILE)
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir().join("exports")
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn config_dir() -> PathBuf {
    home().join(".config").join("daftar")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Expand a leading `~` and resolve relative paths where possible.
pub fn expand_path(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.to_string_lossy());
        }
    }
    std::fs::canonicalize(raw)
        .unwrap_or_else(|_| PathBuf::from(raw))
        .to_string_lossy()
        .to_string()
}
