// SPDX-License-Identifier: MIT

//! The uniform observation record produced by every sensor.

use serde::{Deserialize, Serialize};

/// A single normalised passive-discovery signal.
///
/// Only `source` is required; every other field is omitted from the
/// wire representation when absent rather than serialized as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub source: String,

    #[serde(rename = "ipAddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(rename = "macAddress", skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    #[serde(rename = "typeHint", skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,

    #[serde(rename = "serviceHint", skip_serializing_if = "Option::is_none")]
    pub service_hint: Option<String>,
}

impl Observation {
    /// A bare observation carrying only the required `source` tag.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ip_address: None,
            mac_address: None,
            hostname: None,
            vendor: None,
            type_hint: None,
            service_hint: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac_address = Some(mac.into());
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_type_hint(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    pub fn with_service_hint(mut self, service_hint: impl Into<String>) -> Self {
        self.service_hint = Some(service_hint.into());
        self
    }
}
