//! Frame decoding modules.
//!
//! Each layered protocol follows the same structure:
//! - `layout`: byte offsets and constants (source of truth)
//! - `parser`: decoding through the shared bounds-checked reader
//!
//! Small sniffers (ARP, TLS, HTTP, STUN, ICMP, DHCP) live in single files.
//! Decoding is a total function: short or malformed input truncates the
//! decode at the last layer that fits and never reports an error.

pub(crate) mod arp;
pub(crate) mod common;
pub(crate) mod dhcp;
pub(crate) mod dns;
pub(crate) mod ethernet;
pub(crate) mod frame;
pub(crate) mod http;
pub(crate) mod icmp;
pub(crate) mod ip;
pub(crate) mod payload;
pub(crate) mod stun;
pub(crate) mod tcp;
pub(crate) mod tls;
pub(crate) mod udp;

use crate::source::RawFrame;

pub use ethernet::decode_ethernet;
pub use frame::{
    ArpMeta, DecodedFrame, DhcpMeta, DnsMeta, EchoMeta, EthernetLayer, FrameMeta, IcmpMeta,
    NetworkLayer, TcpFlags, TcpMeta, TransportLayer,
};
pub use http::{StartLine, sniff_start_line};
pub use payload::{PayloadRange, PayloadTransport, extract_frame_payload, extract_payload};
pub use tls::{ClientHello, sniff_client_hello};

/// Decode one captured frame according to its link type.
pub fn decode(frame: &RawFrame<'_>) -> DecodedFrame {
    if ip::is_raw_ip(frame.link_type) {
        ip::decode_raw_ip(frame.data)
    } else {
        decode_ethernet(frame.data)
    }
}
