// SPDX-License-Identifier: MIT

//! Request signing: `X-NetWatch-Signature` / `X-NetWatch-Timestamp` headers
//! computed as HMAC-SHA256 over a canonical `method\npath\ntimestamp\nbody`
//! message. Signing is a no-op when the shared secret is empty.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub struct SignedRequest {
    pub timestamp: String,
    pub signature: String,
}

/// Compute the lowercase-hex HMAC-SHA256 signature over the canonical
/// message `method\npath\ntimestamp\nbody`.
pub fn sign(secret: &str, method: &str, path: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts a key of any length");
    mac.update(method.as_bytes());
    mac.update(b"\n");
    mac.update(path.as_bytes());
    mac.update(b"\n");
    mac.update(timestamp.as_bytes());
    mac.update(b"\n");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Sign a request for the current unix timestamp. Returns `None` when
/// `secret` is empty, signaling the caller to send the request unsigned.
pub fn sign_now(secret: &str, method: &str, path: &str, body: &[u8]) -> Option<SignedRequest> {
    if secret.is_empty() {
        return None;
    }
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = sign(secret, method, path, &timestamp, body);
    Some(SignedRequest {
        timestamp,
        signature,
    })
}
