// SPDX-License-Identifier: MIT

//! Agent configuration.
//!
//! Loaded once from the path named by `NETWATCH_AGENT_CONFIG` (default
//! `config.json`); every key has a default so a missing or empty file is
//! not an error. May be rewritten exactly once, by the registration
//! bootstrap, to persist a newly issued token.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::error::AgentError;

/// Environment variable selecting the config file path.
pub const CONFIG_ENV_VAR: &str = "NETWATCH_AGENT_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub hmac_secret: String,

    #[serde(default)]
    pub registration_code: String,

    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    #[serde(default = "default_status_host")]
    pub status_host: String,

    #[serde(default = "default_status_port")]
    pub status_port: u16,

    #[serde(default = "default_true")]
    pub enable_mdns: bool,

    #[serde(default = "default_true")]
    pub enable_llmnr: bool,

    #[serde(default = "default_true")]
    pub enable_ssdp: bool,

    #[serde(default = "default_true")]
    pub enable_arp_table: bool,

    #[serde(default = "default_arp_interval_seconds")]
    pub arp_interval_seconds: u64,

    #[serde(default)]
    pub enable_dhcp_lease: bool,

    #[serde(default = "default_dhcp_lease_path")]
    pub dhcp_lease_path: String,

    #[serde(default)]
    pub update_check_file: String,

    #[serde(default = "default_update_check_interval_seconds")]
    pub update_check_interval_seconds: u64,

    #[serde(default = "default_queue_max")]
    pub queue_max: usize,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_batch_interval_seconds")]
    pub batch_interval_seconds: u64,
}

fn default_api_base() -> String {
    "http://localhost:5000".to_string()
}
fn default_interval_seconds() -> u64 {
    30
}
fn default_status_host() -> String {
    "127.0.0.1".to_string()
}
fn default_status_port() -> u16 {
    8787
}
fn default_true() -> bool {
    true
}
fn default_arp_interval_seconds() -> u64 {
    60
}
fn default_dhcp_lease_path() -> String {
    "/var/lib/dhcp/dhcpd.leases".to_string()
}
fn default_update_check_interval_seconds() -> u64 {
    300
}
fn default_queue_max() -> usize {
    1000
}
fn default_batch_size() -> usize {
    50
}
fn default_batch_interval_seconds() -> u64 {
    2
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: String::new(),
            hmac_secret: String::new(),
            registration_code: String::new(),
            interval_seconds: default_interval_seconds(),
            status_host: default_status_host(),
            status_port: default_status_port(),
            enable_mdns: true,
            enable_llmnr: true,
            enable_ssdp: true,
            enable_arp_table: true,
            arp_interval_seconds: default_arp_interval_seconds(),
            enable_dhcp_lease: false,
            dhcp_lease_path: default_dhcp_lease_path(),
            update_check_file: String::new(),
            update_check_interval_seconds: default_update_check_interval_seconds(),
            queue_max: default_queue_max(),
            batch_size: default_batch_size(),
            batch_interval_seconds: default_batch_interval_seconds(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from `path`, defaulting if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, AgentError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| AgentError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| AgentError::ConfigParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Persist this config to `path`, pretty-printed, via write-to-temp-then-rename
    /// so a crash mid-write never truncates the live file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut f = std::fs::File::create(&tmp_path)?;
            f.write_all(content.as_bytes())?;
            f.sync_all()?;
        }
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Resolve the config path from `--config`, then `NETWATCH_AGENT_CONFIG`, then the default.
    pub fn resolve_path(cli_path: Option<&Path>) -> std::path::PathBuf {
        if let Some(p) = cli_path {
            return p.to_path_buf();
        }
        std::env::var(CONFIG_ENV_VAR)
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| std::path::PathBuf::from("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.api_base, "http://localhost:5000");
        assert_eq!(cfg.interval_seconds, 30);
        assert_eq!(cfg.status_port, 8787);
        assert_eq!(cfg.queue_max, 1000);
        assert_eq!(cfg.batch_size, 50);
        assert_eq!(cfg.batch_interval_seconds, 2);
        assert!(!cfg.enable_dhcp_lease);
        assert!(cfg.enable_mdns);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AgentConfig::load(Path::new("/nonexistent/netwatch-config.json")).unwrap();
        assert_eq!(cfg.api_base, default_api_base());
    }

    #[test]
    fn partial_json_applies_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"apiBase":"http://example.com","batchSize":10}"#).unwrap();
        let cfg = AgentConfig::load(&path).unwrap();
        assert_eq!(cfg.api_base, "http://example.com");
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.queue_max, 1000);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut cfg = AgentConfig::default();
        cfg.token = "abc123".to_string();
        cfg.save(&path).unwrap();
        let reloaded = AgentConfig::load(&path).unwrap();
        assert_eq!(reloaded.token, "abc123");
    }
}
