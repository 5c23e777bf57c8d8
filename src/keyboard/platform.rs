use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Win,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Mac => "mac",
            Platform::Win => "win",
        }
    }

    /// Maps a host platform string to the chord set it uses. Anything that
    /// is not recognisably macOS gets the Windows/Linux chords.
    pub fn from_host(host: &str) -> Self {
        let host = host.to_ascii_lowercase();
        if host.contains("mac") || host.contains("darwin") {
            Platform::Mac
        } else {
            Platform::Win
        }
    }

    pub fn detect() -> Self {
        Self::from_host(std::env::consts::OS)
    }

    /// Resolves a config value (`auto`, `mac`, `win`).
    pub fn resolve(setting: &str) -> Self {
        setting.parse().unwrap_or_else(|_| Self::detect())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mac" | "macos" => Ok(Platform::Mac),
            "win" | "windows" | "linux" => Ok(Platform::Win),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}
