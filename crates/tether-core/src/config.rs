//! Configuration system for tether.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $TETHER_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/tether/config.toml
//!   3. ~/.config/tether/config.toml

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::mirror::MirrorTiming;
use crate::source::SourceTiming;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    pub network: NetworkConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Host the peer process lives on.
    pub peer_host: String,
    /// UDP port the source role binds (and the mirror targets).
    pub source_port: u16,
    /// UDP port the mirror role binds (and the source targets).
    pub mirror_port: u16,
}

/// All protocol countdowns, in the units the wire protocol was tuned with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Source-side bounded receive, per loop iteration.
    pub source_receive_timeout_ms: u64,
    /// Mirror-side bounded receive, per loop iteration.
    pub mirror_receive_timeout_ms: u64,
    /// How long an identity offer waits for its acknowledgment.
    pub reply_window_secs: u64,
    /// Peer silence after which the source declares the link dead.
    pub disconnect_secs: u64,
    /// Minimum interval between resends of an unchanged value.
    pub resend_cooldown_ms: u64,
    /// Mirror beacon interval while the medium is quiet.
    pub beacon_secs: u64,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            peer_host: "127.0.0.1".to_string(),
            source_port: 2521,
            mirror_port: 2520,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            source_receive_timeout_ms: 3000,
            mirror_receive_timeout_ms: 1000,
            reply_window_secs: 10,
            disconnect_secs: 16,
            resend_cooldown_ms: 200,
            beacon_secs: 1,
        }
    }
}

impl TimingConfig {
    pub fn source_receive_timeout(&self) -> Duration {
        Duration::from_millis(self.source_receive_timeout_ms)
    }

    pub fn mirror_receive_timeout(&self) -> Duration {
        Duration::from_millis(self.mirror_receive_timeout_ms)
    }

    pub fn source_timing(&self) -> SourceTiming {
        SourceTiming {
            reply_window: Duration::from_secs(self.reply_window_secs),
            disconnect: Duration::from_secs(self.disconnect_secs),
            resend_cooldown: Duration::from_millis(self.resend_cooldown_ms),
        }
    }

    pub fn mirror_timing(&self) -> MirrorTiming {
        MirrorTiming {
            beacon: Duration::from_secs(self.beacon_secs),
        }
    }
}

// ── Path helpers ─────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("tether")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl TetherConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            TetherConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("TETHER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&TetherConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply TETHER_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("TETHER_NETWORK__PEER_HOST") {
            self.network.peer_host = v;
        }
        if let Ok(v) = std::env::var("TETHER_NETWORK__SOURCE_PORT") {
            if let Ok(p) = v.parse() {
                self.network.source_port = p;
            }
        }
        if let Ok(v) = std::env::var("TETHER_NETWORK__MIRROR_PORT") {
            if let Ok(p) = v.parse() {
                self.network.mirror_port = p;
            }
        }
        if let Ok(v) = std::env::var("TETHER_TIMING__DISCONNECT_SECS") {
            if let Ok(s) = v.parse() {
                self.timing.disconnect_secs = s;
            }
        }
        if let Ok(v) = std::env::var("TETHER_TIMING__BEACON_SECS") {
            if let Ok(s) = v.parse() {
                self.timing.beacon_secs = s;
            }
        }
    }
}
