//! Optional RON configuration for the terminal host.
//!
//! Looked up at `--config FILE` or `./adjudicator.ron`. Every field is
//! optional; command-line flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use adjudicator_client::ClientSettings;
use adjudicator_core::CreditGate;
use anyhow::Context;
use client_logging::client_info;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "adjudicator.ron";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: Option<String>,
    pub stream_path: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub stream_idle_timeout_secs: Option<u64>,
    pub storage_dir: Option<PathBuf>,
    pub credits: Option<CreditsConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreditsConfig {
    pub available: u32,
    pub minimum: u32,
    #[serde(default)]
    pub message: Option<String>,
}

impl CreditsConfig {
    pub fn gate(&self) -> CreditGate {
        let gate = CreditGate::new(self.available, self.minimum);
        match &self.message {
            Some(message) => gate.with_message(message.clone()),
            None => gate,
        }
    }
}

impl ClientConfig {
    /// Load an explicit config file, or the default one when it exists.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        client_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub fn apply(&self, settings: &mut ClientSettings) {
        if let Some(server) = &self.server {
            settings.base_url = server.clone();
        }
        if let Some(stream_path) = &self.stream_path {
            settings.stream_path = stream_path.clone();
        }
        if let Some(secs) = self.connect_timeout_secs {
            settings.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.stream_idle_timeout_secs {
            settings.stream_idle_timeout = Duration::from_secs(secs);
        }
    }
}
