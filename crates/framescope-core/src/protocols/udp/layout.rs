use crate::protocols::common::ports::PortApp;

pub const HEADER_LEN: usize = 8;
pub const SRC_PORT_OFFSET: usize = 0;
pub const DST_PORT_OFFSET: usize = 2;

/// Port-only classifications, consulted before the payload heuristics.
pub(crate) const PORT_APPS: &[PortApp] = &[
    PortApp::new(&[161, 162], "SNMP", "SNMP", "SNMP"),
    PortApp::new(&[514], "Syslog", "SYSLOG", "SYSLOG"),
    PortApp::new(&[69], "TFTP", "TFTP", "TFTP"),
    PortApp::new(&[137, 138], "NetBIOS", "NETBIOS", "NETBIOS"),
    PortApp::new(&[546, 547], "DHCPv6", "DHCPv6", "DHCPv6"),
    PortApp::new(&[520], "RIP", "RIP", "RIP"),
    PortApp::new(&[5060], "SIP", "SIP", "SIP"),
    PortApp::new(&[1900], "SSDP", "UDP", "SSDP"),
];

/// Entries after the STUN check.
pub(crate) const LATE_PORT_APPS: &[PortApp] = &[
    PortApp::new(&[5353], "mDNS", "UDP", "MDNS"),
    PortApp::new(&[5355], "LLMNR", "UDP", "LLMNR"),
    PortApp::new(&[5683], "CoAP", "UDP", "COAP"),
    PortApp::new(&[123], "NTP", "UDP", "NTP"),
];

pub const STUN_PORT: u16 = 3478;
pub const QUIC_PORT: u16 = 443;

pub const RTP_VERSION_MASK: u8 = 0xc0;
pub const RTP_VERSION_2: u8 = 0x80;
pub const RTCP_PAYLOAD_TYPES: std::ops::RangeInclusive<u8> = 200..=204;
pub const RTP_MIN_LEN: usize = 12;
