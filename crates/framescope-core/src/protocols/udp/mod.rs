//! UDP header decode and application classification.
//!
//! DNS is probed on port 53 before the port table. RTP/RTCP, QUIC and DHCP
//! are payload or port heuristics applied when no table entry matched.

pub mod layout;
pub mod parser;

pub(crate) use parser::decode_udp;
