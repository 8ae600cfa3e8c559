//! IPv4 and IPv6 headers plus transport dispatch.

pub mod layout;
pub mod parser;

pub(crate) use parser::{
    IpVersion, NetworkOutcome, decode_ipv4, decode_ipv6, decode_raw_ip, is_raw_ip,
};
