// SPDX-License-Identifier: MIT

//! Update checker (C11): periodically polls a local version-manifest
//! file and flags `status.updateAvailable` when it names a version
//! different from the compiled-in `VERSION`. Errors are swallowed,
//! leaving the previous status values in place.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::status::{Status, VERSION};

#[derive(Deserialize)]
struct Manifest {
    version: Option<String>,
}

/// Run the update-check loop forever.
pub async fn run(manifest_path: String, interval: Duration, status: Arc<Status>) {
    loop {
        tick(&manifest_path, &status).await;
        tokio::time::sleep(interval).await;
    }
}

async fn tick(manifest_path: &str, status: &Status) {
    if manifest_path.is_empty() {
        status.set_update_check(false, None);
        return;
    }

    match tokio::fs::read_to_string(manifest_path).await {
        Ok(content) => match serde_json::from_str::<Manifest>(&content) {
            Ok(manifest) => match manifest.version {
                Some(v) if v != VERSION => status.set_update_check(true, Some(v)),
                _ => status.set_update_check(false, None),
            },
            Err(e) => {
                debug!(path = manifest_path, error = %e, "failed to parse update manifest");
                status.set_update_check(false, None);
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            status.set_update_check(false, None);
        }
        Err(e) => {
            debug!(path = manifest_path, error = %e, "failed to read update manifest");
            status.set_update_check(false, None);
        }
    }
}
