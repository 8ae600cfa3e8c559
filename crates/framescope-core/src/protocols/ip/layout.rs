use pcap_parser::Linktype;

pub const IPV4_MIN_HEADER_LEN: usize = 20;
pub const IPV4_VERSION_IHL_OFFSET: usize = 0;
pub const IPV4_PROTOCOL_OFFSET: usize = 9;
pub const IPV4_SRC_OFFSET: usize = 12;
pub const IPV4_DST_OFFSET: usize = 16;

pub const IPV6_HEADER_LEN: usize = 40;
pub const IPV6_NEXT_HEADER_OFFSET: usize = 6;
pub const IPV6_SRC_OFFSET: usize = 8;
pub const IPV6_DST_OFFSET: usize = 24;

pub const PROTO_ICMP: u8 = 1;
pub const PROTO_TCP: u8 = 6;
pub const PROTO_UDP: u8 = 17;
pub const PROTO_ICMPV6: u8 = 58;

pub const LINKTYPE_IPV4: Linktype = Linktype(228);
pub const LINKTYPE_IPV6: Linktype = Linktype(229);
