// SPDX-License-Identifier: MIT

//! Agent-wide error types for the few paths that are allowed to fail loudly.
//!
//! Producers, pollers and the sender follow spec.md's "absorb and continue"
//! philosophy and do not raise through these types; only config loading and
//! the status-server bind are expected to surface an `AgentError` to `main`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to bind status endpoint on {addr}: {source}")]
    StatusBind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
