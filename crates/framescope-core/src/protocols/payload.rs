//! Transport payload location, independent of the full decode.

use serde::Serialize;

use crate::source::RawFrame;

use super::common::reader::ByteReader;
use super::ethernet::{layout as eth_layout, network_offset};
use super::ip::{is_raw_ip, layout as ip_layout, parser::ipv4_header_len};
use super::tcp::layout as tcp_layout;
use super::udp::layout as udp_layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadTransport {
    Tcp,
    Udp,
    Other,
}

/// Byte range of a frame's transport payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayloadRange {
    pub transport: PayloadTransport,
    pub offset: usize,
    pub length: usize,
}

impl PayloadRange {
    pub fn slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        self.offset
            .checked_add(self.length)
            .and_then(|end| data.get(self.offset..end))
            .unwrap_or_default()
    }
}

/// Locate the TCP/UDP payload of an Ethernet frame.
///
/// # Examples
/// ```
/// use framescope_core::extract_payload;
///
/// // Ethernet + IPv4 without a complete transport header.
/// let mut frame = vec![0u8; 12];
/// frame.extend_from_slice(&[0x08, 0x00]);
/// frame.extend_from_slice(&[0x45; 1]);
/// frame.extend_from_slice(&[0u8; 19]);
/// assert!(extract_payload(&frame).is_some());
/// assert!(extract_payload(&frame[..20]).is_none());
/// ```
pub fn extract_payload(data: &[u8]) -> Option<PayloadRange> {
    let reader = ByteReader::new(data);
    let (ether_type, off) = network_offset(&reader)?;
    from_network(&reader, ether_type, off)
}

/// [`extract_payload`] after the same link-type dispatch as the decoder.
pub fn extract_frame_payload(frame: &RawFrame<'_>) -> Option<PayloadRange> {
    if !is_raw_ip(frame.link_type) {
        return extract_payload(frame.data);
    }
    let reader = ByteReader::new(frame.data);
    let ether_type = match reader.u8(0)? >> 4 {
        4 => eth_layout::ETHERTYPE_IPV4,
        6 => eth_layout::ETHERTYPE_IPV6,
        _ => return None,
    };
    from_network(&reader, ether_type, 0)
}

fn from_network(reader: &ByteReader<'_>, ether_type: u16, off: usize) -> Option<PayloadRange> {
    match ether_type {
        eth_layout::ETHERTYPE_IPV4 => {
            if !reader.has(off, ip_layout::IPV4_MIN_HEADER_LEN) {
                return None;
            }
            let ihl = ipv4_header_len(reader, off)?;
            let protocol = reader.u8(off + ip_layout::IPV4_PROTOCOL_OFFSET)?;
            transport_range(reader, off + ihl, protocol)
        }
        eth_layout::ETHERTYPE_IPV6 => {
            let l4 = off + ip_layout::IPV6_HEADER_LEN;
            if reader.len() < l4 {
                return None;
            }
            let next_header = reader.u8(off + ip_layout::IPV6_NEXT_HEADER_OFFSET)?;
            transport_range(reader, l4, next_header)
        }
        _ => None,
    }
}

fn transport_range(reader: &ByteReader<'_>, l4: usize, protocol: u8) -> Option<PayloadRange> {
    let (transport, start) = match protocol {
        ip_layout::PROTO_TCP => {
            if !reader.has(l4, tcp_layout::MIN_HEADER_LEN) {
                return None;
            }
            let data_offset = usize::from(reader.u8(l4 + tcp_layout::DATA_OFFSET_OFFSET)? >> 4) * 4;
            (PayloadTransport::Tcp, l4 + data_offset)
        }
        ip_layout::PROTO_UDP => {
            if !reader.has(l4, udp_layout::HEADER_LEN) {
                return None;
            }
            (PayloadTransport::Udp, l4 + udp_layout::HEADER_LEN)
        }
        _ => (PayloadTransport::Other, l4),
    };
    Some(PayloadRange {
        transport,
        offset: start,
        length: reader.len().saturating_sub(start),
    })
}
