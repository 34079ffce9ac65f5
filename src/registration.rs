// SPDX-License-Identifier: MIT

//! Registration bootstrap (C10): one-shot exchange of a human-issued code
//! for a persistent bearer token, run once before producers start. Any
//! failure is swallowed and the agent continues unauthenticated.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AgentConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const REGISTER_PATH: &str = "/api/agent/register";

#[derive(Serialize)]
struct RegisterRequest<'a> {
    code: &'a str,
    name: String,
}

#[derive(Deserialize)]
struct RegisterResponse {
    token: Option<String>,
}

/// If `config.token` is empty and `config.registration_code` is set,
/// exchange the code for a token and persist it to `config_path`.
/// Mutates `config.token` in place on success.
pub async fn bootstrap_if_needed(config: &mut AgentConfig, config_path: &Path) {
    if !config.token.is_empty() || config.registration_code.is_empty() {
        return;
    }

    let hostname = hostname();
    match register(&config.api_base, &config.registration_code, hostname).await {
        Ok(Some(token)) => {
            config.token = token;
            if let Err(e) = config.save(config_path) {
                warn!(error = %e, "failed to persist issued token to config file");
            } else {
                info!("registration bootstrap succeeded, token persisted");
            }
        }
        Ok(None) => warn!("registration response carried no token"),
        Err(e) => warn!(error = %e, "registration bootstrap failed, continuing unauthenticated"),
    }
}

async fn register(
    api_base: &str,
    code: &str,
    name: String,
) -> Result<Option<String>, reqwest::Error> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let url = format!("{api_base}{REGISTER_PATH}");
    let body = RegisterRequest { code, name };

    let resp = client.post(&url).json(&body).send().await?;
    let parsed: RegisterResponse = resp.json().await?;
    Ok(parsed.token)
}

fn hostname() -> String {
    // No portable std API for this; fall back to a stable placeholder if
    // the environment genuinely can't tell us (e.g. stripped containers).
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| {
            hostname_from_proc().or_else(|| {
                std::process::Command::new("hostname")
                    .output()
                    .ok()
                    .and_then(|o| String::from_utf8(o.stdout).ok())
                    .map(|s| s.trim().to_string())
            })
        })
        .unwrap_or_else(|| "netwatch-agent".to_string())
}

fn hostname_from_proc() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skips_when_token_already_present() {
        let mut config = AgentConfig {
            token: "already-set".to_string(),
            registration_code: "CODE123".to_string(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        bootstrap_if_needed(&mut config, &path).await;
        assert_eq!(config.token, "already-set");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn skips_when_no_registration_code() {
        let mut config = AgentConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        bootstrap_if_needed(&mut config, &path).await;
        assert!(config.token.is_empty());
    }
}
