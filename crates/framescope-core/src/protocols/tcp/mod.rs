//! TCP header decode and application sniffing.
//!
//! Sniffers run in a fixed order on the segment payload: TLS ClientHello,
//! HTTP start line, STUN, then the well-known port table. A segment matching
//! none of them is summarized by ports and flags.

pub mod layout;
pub mod parser;

pub(crate) use parser::decode_tcp;
