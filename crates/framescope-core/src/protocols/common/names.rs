//! Static number-to-name tables.

pub(crate) fn ipv4_protocol_name(protocol: u8) -> String {
    let name = match protocol {
        1 => "ICMP",
        2 => "IGMP",
        6 => "TCP",
        17 => "UDP",
        33 => "DCCP",
        47 => "GRE",
        50 => "ESP",
        51 => "AH",
        88 => "EIGRP",
        89 => "OSPF",
        132 => "SCTP",
        other => return format!("Proto {}", other),
    };
    name.to_string()
}

pub(crate) fn ipv6_next_header_name(next_header: u8) -> String {
    let name = match next_header {
        58 => "ICMPv6",
        6 => "TCP",
        17 => "UDP",
        other => return format!("NH {}", other),
    };
    name.to_string()
}

/// Query type mnemonic; `None` for a missing or zero type.
pub(crate) fn dns_type_name(qtype: Option<u16>) -> Option<String> {
    let qtype = qtype.filter(|t| *t != 0)?;
    let name = match qtype {
        1 => "A",
        28 => "AAAA",
        5 => "CNAME",
        12 => "PTR",
        15 => "MX",
        16 => "TXT",
        6 => "SOA",
        33 => "SRV",
        35 => "NAPTR",
        other => return Some(format!("TYPE{}", other)),
    };
    Some(name.to_string())
}
