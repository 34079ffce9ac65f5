// SPDX-License-Identifier: MIT

//! SSDP (text, HTTP-style) header extraction from passive multicast payloads.

/// Header values of interest pulled out of an SSDP NOTIFY/response payload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SsdpHeaders {
    pub server: Option<String>,
    pub st: Option<String>,
    pub usn: Option<String>,
}

/// Decode `data` lossily as UTF-8, then take the last occurrence of the
/// `SERVER`, `ST`, and `USN` headers (case-insensitive key match).
pub fn parse(data: &[u8]) -> SsdpHeaders {
    let text = String::from_utf8_lossy(data);
    let mut headers = SsdpHeaders::default();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        match key.as_str() {
            "server" => headers.server = Some(value),
            "st" => headers.st = Some(value),
            "usn" => headers.usn = Some(value),
            _ => {}
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_three_headers_case_insensitively() {
        let payload = b"NOTIFY * HTTP/1.1\r\nSeRvEr: Foo/1.0\r\nst: upnp:rootdevice\r\nUSN: uuid:abc\r\n\r\n";
        let headers = parse(payload);
        assert_eq!(headers.server.as_deref(), Some("Foo/1.0"));
        assert_eq!(headers.st.as_deref(), Some("upnp:rootdevice"));
        assert_eq!(headers.usn.as_deref(), Some("uuid:abc"));
    }

    #[test]
    fn keeps_last_occurrence_of_a_repeated_header() {
        let payload = b"ST: first\r\nST: second\r\n";
        let headers = parse(payload);
        assert_eq!(headers.st.as_deref(), Some("second"));
    }

    #[test]
    fn lines_without_a_colon_are_ignored() {
        let payload = b"NOTIFY * HTTP/1.1\r\nSERVER: Foo\r\n";
        let headers = parse(payload);
        assert_eq!(headers.server.as_deref(), Some("Foo"));
        assert!(headers.st.is_none());
    }

    #[test]
    fn invalid_utf8_is_handled_lossily_not_rejected() {
        let payload = b"SERVER: \xff\xfeBroken\r\n";
        let headers = parse(payload);
        assert!(headers.server.is_some());
    }
}
