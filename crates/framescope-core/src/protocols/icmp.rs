//! ICMPv4 / ICMPv6 type and code, with echo identifiers.

use super::common::reader::ByteReader;
use super::frame::{EchoMeta, FrameMeta, IcmpMeta, TransportDecode, TransportLayer};
use super::ip::IpVersion;

const MIN_LEN: usize = 2;
const ECHO_HEADER_LEN: usize = 8;
const ECHO_ID_OFFSET: usize = 4;
const ECHO_SEQ_OFFSET: usize = 6;

pub const V4_ECHO_REPLY: u8 = 0;
pub const V4_ECHO_REQUEST: u8 = 8;
pub const V6_ECHO_REQUEST: u8 = 128;
pub const V6_ECHO_REPLY: u8 = 129;

/// Whether `icmp_type` is an echo request or reply for this IP version.
pub(crate) fn echo_kind(version: IpVersion, icmp_type: u8) -> Option<EchoKind> {
    match (version, icmp_type) {
        (IpVersion::V4, V4_ECHO_REQUEST) | (IpVersion::V6, V6_ECHO_REQUEST) => {
            Some(EchoKind::Request)
        }
        (IpVersion::V4, V4_ECHO_REPLY) | (IpVersion::V6, V6_ECHO_REPLY) => Some(EchoKind::Reply),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EchoKind {
    Request,
    Reply,
}

pub(crate) fn decode_icmp(
    reader: &ByteReader<'_>,
    off: usize,
    version: IpVersion,
) -> Option<TransportDecode> {
    if !reader.has(off, MIN_LEN) {
        return None;
    }
    let icmp_type = reader.u8(off)?;
    let code = reader.u8(off + 1)?;

    let echo = if echo_kind(version, icmp_type).is_some() && reader.has(off, ECHO_HEADER_LEN) {
        Some(EchoMeta {
            id: reader.u16_be(off + ECHO_ID_OFFSET)?,
            seq: reader.u16_be(off + ECHO_SEQ_OFFSET)?,
        })
    } else {
        None
    };

    let l4 = match version {
        IpVersion::V4 => TransportLayer::Icmpv4 { icmp_type, code },
        IpVersion::V6 => TransportLayer::Icmpv6 { icmp_type, code },
    };
    let name = l4.name();
    let meta = FrameMeta {
        icmp: Some(IcmpMeta {
            icmp_type,
            code,
            echo,
        }),
        ..FrameMeta::default()
    };
    Some(
        TransportDecode::new(
            l4,
            format!("{} type {} code {}", name, icmp_type, code),
            name,
        )
        .with_meta(meta),
    )
}
