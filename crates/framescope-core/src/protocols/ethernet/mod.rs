//! Ethernet II framing, 802.1Q tags and the 802.3 LLC/SNAP family.
//!
//! The decoder dispatches on the EtherType to the IP and ARP decoders. A too
//! short IPv6 or ARP header falls back to the generic EtherType summary, and
//! a malformed IPv4 header length is reported as `IPv4 (bad header)`.

pub mod layout;
pub mod parser;

pub use parser::decode_ethernet;
pub(crate) use parser::network_offset;
