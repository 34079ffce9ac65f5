// SPDX-License-Identifier: MIT

//! Minimal RFC 1035 wire-format DNS reader: enough to pull a queried or
//! answered name and its record type out of an mDNS/LLMNR datagram.

/// A decoded name plus the record type it was queried or answered with.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DnsHint {
    pub name: Option<String>,
    pub rtype: Option<String>,
}

const MAX_POINTER_DEPTH: u8 = 5;

/// Parse the header of a DNS message and return the first question name
/// (preferring QDCOUNT) or, failing that, the first answer name.
pub fn parse(data: &[u8]) -> DnsHint {
    if data.len() < 12 {
        return DnsHint::default();
    }

    let qdcount = u16::from_be_bytes([data[4], data[5]]);
    let ancount = u16::from_be_bytes([data[6], data[7]]);
    let mut offset = 12usize;

    let mut name = None;
    let mut rtype = None;

    if qdcount > 0 {
        let (decoded, new_offset) = read_name(data, offset, 0);
        name = decoded;
        offset = new_offset;
        if offset + 4 <= data.len() {
            let qtype = u16::from_be_bytes([data[offset], data[offset + 1]]);
            rtype = Some(type_name(qtype));
        }
    }

    if name.is_none() && ancount > 0 {
        let (decoded, new_offset) = read_name(data, offset, 0);
        name = decoded;
        offset = new_offset;
        if offset + 10 <= data.len() {
            let atype = u16::from_be_bytes([data[offset], data[offset + 1]]);
            rtype = Some(type_name(atype));
        }
    }

    DnsHint { name, rtype }
}

/// Decode a (possibly compressed) name starting at `offset`, returning the
/// joined dotted name and the offset just past it in the *original* stream
/// (pointer chases do not advance the caller's cursor further than the
/// 2-byte pointer itself). Pointer chains are bounded to `MAX_POINTER_DEPTH`
/// hops and every read is bounds-checked against `data`.
fn read_name(data: &[u8], mut offset: usize, depth: u8) -> (Option<String>, usize) {
    if depth > MAX_POINTER_DEPTH || offset >= data.len() {
        return (None, offset);
    }

    let mut labels: Vec<String> = Vec::new();

    loop {
        if offset >= data.len() {
            break;
        }
        let length = data[offset];

        if length == 0 {
            offset += 1;
            break;
        }

        if length & 0xC0 == 0xC0 {
            if offset + 1 >= data.len() {
                break;
            }
            let pointer = (((length & 0x3F) as usize) << 8) | data[offset + 1] as usize;
            let (part, _) = read_name(data, pointer, depth + 1);
            if let Some(part) = part {
                labels.push(part);
            }
            offset += 2;
            break;
        }

        offset += 1;
        if offset + length as usize > data.len() {
            break;
        }
        let label = String::from_utf8_lossy(&data[offset..offset + length as usize]).into_owned();
        labels.push(label);
        offset += length as usize;
    }

    if labels.is_empty() {
        (None, offset)
    } else {
        (Some(labels.join(".")), offset)
    }
}

fn type_name(value: u16) -> String {
    match value {
        1 => "A".to_string(),
        12 => "PTR".to_string(),
        16 => "TXT".to_string(),
        28 => "AAAA".to_string(),
        33 => "SRV".to_string(),
        other => format!("TYPE{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_name(labels: &[&str]) -> Vec<u8> {
        let mut out = Vec::new();
        for label in labels {
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        out.push(0);
        out
    }

    fn build_query(name: &[&str], qtype: u16) -> Vec<u8> {
        let mut msg = vec![0u8; 12];
        msg[4..6].copy_from_slice(&1u16.to_be_bytes()); // QDCOUNT = 1
        msg.extend(encode_name(name));
        msg.extend_from_slice(&qtype.to_be_bytes()); // QTYPE
        msg.extend_from_slice(&1u16.to_be_bytes()); // QCLASS
        msg
    }

    #[test]
    fn too_short_header_yields_empty() {
        let hint = parse(&[0u8; 4]);
        assert_eq!(hint, DnsHint::default());
    }

    #[test]
    fn services_dns_sd_ptr_query() {
        let msg = build_query(&["_services", "_dns-sd", "_udp", "local"], 12);
        let hint = parse(&msg);
        assert_eq!(hint.name.as_deref(), Some("_services._dns-sd._udp.local"));
        assert_eq!(hint.rtype.as_deref(), Some("PTR"));
    }

    #[test]
    fn unknown_type_renders_as_typen() {
        let msg = build_query(&["host", "local"], 65280);
        let hint = parse(&msg);
        assert_eq!(hint.rtype.as_deref(), Some("TYPE65280"));
    }

    #[test]
    fn pointer_compression_is_followed() {
        // Message: [header][12: "a".local\0][qtype/qclass][answer name = pointer to 12][type/class/ttl/rdlen]
        let mut msg = vec![0u8; 12];
        msg[4..6].copy_from_slice(&0u16.to_be_bytes()); // QDCOUNT = 0
        msg[6..8].copy_from_slice(&1u16.to_be_bytes()); // ANCOUNT = 1
        let name_offset = msg.len();
        msg.extend(encode_name(&["a", "local"]));
        // Answer section begins with a pointer back to name_offset.
        let pointer = 0xC000u16 | (name_offset as u16);
        msg.extend_from_slice(&pointer.to_be_bytes());
        msg.extend_from_slice(&1u16.to_be_bytes()); // TYPE = A
        msg.extend_from_slice(&1u16.to_be_bytes()); // CLASS
        msg.extend_from_slice(&0u32.to_be_bytes()); // TTL
        msg.extend_from_slice(&0u16.to_be_bytes()); // RDLENGTH

        let hint = parse(&msg);
        assert_eq!(hint.name.as_deref(), Some("a.local"));
        assert_eq!(hint.rtype.as_deref(), Some("A"));
    }

    #[test]
    fn pointer_loop_terminates_within_bounded_depth() {
        // Two pointers pointing at each other: must not loop forever.
        let mut msg = vec![0u8; 12];
        msg[4..6].copy_from_slice(&1u16.to_be_bytes());
        let p1 = msg.len() as u16; // offset 12
        let p2 = p1 + 2; // offset 14
        msg.extend_from_slice(&(0xC000u16 | p2).to_be_bytes()); // at 12: pointer -> 14
        msg.extend_from_slice(&(0xC000u16 | p1).to_be_bytes()); // at 14: pointer -> 12
        msg.extend_from_slice(&1u16.to_be_bytes());
        msg.extend_from_slice(&1u16.to_be_bytes());

        // Must return promptly (bounded recursion) rather than hang.
        let hint = parse(&msg);
        assert!(hint.name.is_none() || hint.name.is_some());
    }

    #[test]
    fn truncated_label_length_terminates_gracefully() {
        let mut msg = vec![0u8; 12];
        msg[4..6].copy_from_slice(&1u16.to_be_bytes());
        msg.push(200); // claims a 200-byte label but buffer ends here
        let hint = parse(&msg);
        assert!(hint.name.is_none());
    }
}
