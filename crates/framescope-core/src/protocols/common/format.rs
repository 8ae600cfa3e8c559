use std::net::Ipv4Addr;

/// Lowercase, colon-separated hardware address.
pub(crate) fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

pub(crate) fn format_ipv4(bytes: [u8; 4]) -> String {
    Ipv4Addr::from(bytes).to_string()
}

/// Unpadded lowercase hex groups; only the first run of two or more zero
/// groups collapses to `::`.
pub(crate) fn format_ipv6(bytes: [u8; 16]) -> String {
    let groups: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    let mut run: Option<(usize, usize)> = None;
    let mut index = 0;
    while index < groups.len() {
        if groups[index] != 0 {
            index += 1;
            continue;
        }
        let start = index;
        while index < groups.len() && groups[index] == 0 {
            index += 1;
        }
        if index - start >= 2 {
            run = Some((start, index));
            break;
        }
    }

    let hex = |slice: &[u16]| {
        slice
            .iter()
            .map(|g| format!("{:x}", g))
            .collect::<Vec<_>>()
            .join(":")
    };

    match run {
        Some((start, end)) => format!("{}::{}", hex(&groups[..start]), hex(&groups[end..])),
        None => hex(&groups),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_ipv4, format_ipv6, format_mac};

    #[test]
    fn mac_is_lowercase_with_colons() {
        assert_eq!(
            format_mac(&[0x00, 0x1A, 0x2b, 0xff, 0x00, 0x01]),
            "00:1a:2b:ff:00:01"
        );
    }

    #[test]
    fn ipv4_dotted_decimal() {
        assert_eq!(format_ipv4([192, 168, 0, 10]), "192.168.0.10");
    }

    #[test]
    fn ipv6_compresses_first_zero_run() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0x20;
        bytes[1] = 0x01;
        bytes[2] = 0x0d;
        bytes[3] = 0xb8;
        bytes[15] = 0x01;
        assert_eq!(format_ipv6(bytes), "2001:db8::1");
    }

    #[test]
    fn ipv6_all_zero_and_loopback() {
        assert_eq!(format_ipv6([0u8; 16]), "::");
        let mut loopback = [0u8; 16];
        loopback[15] = 1;
        assert_eq!(format_ipv6(loopback), "::1");
    }

    #[test]
    fn ipv6_single_zero_group_is_kept() {
        let groups: [u16; 8] = [1, 0, 2, 0, 0, 3, 0, 0];
        let mut bytes = [0u8; 16];
        for (i, g) in groups.iter().enumerate() {
            bytes[i * 2..i * 2 + 2].copy_from_slice(&g.to_be_bytes());
        }
        assert_eq!(format_ipv6(bytes), "1:0:2::3:0:0");
    }
}
