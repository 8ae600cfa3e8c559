use pcap_parser::Linktype;

use crate::protocols::common::format::{format_ipv4, format_ipv6};
use crate::protocols::common::names::{ipv4_protocol_name, ipv6_next_header_name};
use crate::protocols::common::reader::ByteReader;
use crate::protocols::frame::{DecodedFrame, NetworkLayer, TAG_FRAME, TransportDecode};
use crate::protocols::{icmp, tcp, udp};

use super::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IpVersion {
    V4,
    V6,
}

#[derive(Debug)]
pub(crate) enum NetworkOutcome {
    Decoded {
        l3: NetworkLayer,
        transport: TransportDecode,
    },
    /// IPv4 header length below the minimum or past the frame end.
    BadHeader,
    TooShort,
}

pub(crate) fn decode_ipv4(reader: &ByteReader<'_>, off: usize) -> NetworkOutcome {
    if !reader.has(off, layout::IPV4_MIN_HEADER_LEN) {
        return NetworkOutcome::TooShort;
    }
    let Some(ihl) = ipv4_header_len(reader, off) else {
        return NetworkOutcome::BadHeader;
    };
    let (Some(protocol), Some(src), Some(dst)) = (
        reader.u8(off + layout::IPV4_PROTOCOL_OFFSET),
        reader.array::<4>(off + layout::IPV4_SRC_OFFSET),
        reader.array::<4>(off + layout::IPV4_DST_OFFSET),
    ) else {
        return NetworkOutcome::TooShort;
    };

    NetworkOutcome::Decoded {
        l3: NetworkLayer::Ipv4 {
            src: format_ipv4(src),
            dst: format_ipv4(dst),
            protocol,
        },
        transport: decode_transport(reader, off + ihl, protocol, IpVersion::V4),
    }
}

/// Validated IPv4 header length in bytes.
pub(crate) fn ipv4_header_len(reader: &ByteReader<'_>, off: usize) -> Option<usize> {
    let ihl = usize::from(reader.u8(off + layout::IPV4_VERSION_IHL_OFFSET)? & 0x0f) * 4;
    if ihl < layout::IPV4_MIN_HEADER_LEN || !reader.has(off, ihl) {
        return None;
    }
    Some(ihl)
}

pub(crate) fn decode_ipv6(reader: &ByteReader<'_>, off: usize) -> NetworkOutcome {
    if !reader.has(off, layout::IPV6_HEADER_LEN) {
        return NetworkOutcome::TooShort;
    }
    let (Some(next_header), Some(src), Some(dst)) = (
        reader.u8(off + layout::IPV6_NEXT_HEADER_OFFSET),
        reader.array::<16>(off + layout::IPV6_SRC_OFFSET),
        reader.array::<16>(off + layout::IPV6_DST_OFFSET),
    ) else {
        return NetworkOutcome::TooShort;
    };

    NetworkOutcome::Decoded {
        l3: NetworkLayer::Ipv6 {
            src: format_ipv6(src),
            dst: format_ipv6(dst),
            next_header,
        },
        transport: decode_transport(
            reader,
            off + layout::IPV6_HEADER_LEN,
            next_header,
            IpVersion::V6,
        ),
    }
}

fn decode_transport(
    reader: &ByteReader<'_>,
    off: usize,
    protocol: u8,
    version: IpVersion,
) -> TransportDecode {
    let decoded = match (protocol, version) {
        (layout::PROTO_TCP, _) => tcp::decode_tcp(reader, off),
        (layout::PROTO_UDP, _) => udp::decode_udp(reader, off),
        (layout::PROTO_ICMP, IpVersion::V4) | (layout::PROTO_ICMPV6, IpVersion::V6) => {
            icmp::decode_icmp(reader, off, version)
        }
        _ => None,
    };
    decoded.unwrap_or_else(|| {
        TransportDecode::named(match version {
            IpVersion::V4 => ipv4_protocol_name(protocol),
            IpVersion::V6 => ipv6_next_header_name(protocol),
        })
    })
}

pub(crate) fn is_raw_ip(link_type: Linktype) -> bool {
    link_type == Linktype::RAW
        || link_type == layout::LINKTYPE_IPV4
        || link_type == layout::LINKTYPE_IPV6
}

/// Decode a frame that starts directly at the IP header.
pub(crate) fn decode_raw_ip(data: &[u8]) -> DecodedFrame {
    let reader = ByteReader::new(data);
    let outcome = match reader.u8(0).map(|b| b >> 4) {
        Some(4) => decode_ipv4(&reader, 0),
        Some(6) => decode_ipv6(&reader, 0),
        _ => NetworkOutcome::TooShort,
    };
    match outcome {
        NetworkOutcome::Decoded { l3, transport } => DecodedFrame::network(None, l3, transport),
        NetworkOutcome::BadHeader => DecodedFrame::bare("IPv4 (bad header)".to_string(), TAG_FRAME),
        NetworkOutcome::TooShort => {
            DecodedFrame::bare(format!("Raw IP frame ({}B)", data.len()), TAG_FRAME)
        }
    }
}
