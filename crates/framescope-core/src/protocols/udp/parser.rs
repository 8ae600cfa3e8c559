use crate::protocols::common::ports::lookup_port_app;
use crate::protocols::common::reader::ByteReader;
use crate::protocols::dhcp::{decode_dhcp, is_dhcp_port};
use crate::protocols::dns::{DnsDecode, decode_dns, layout as dns_layout};
use crate::protocols::frame::{FrameMeta, TAG_DNS, TAG_UDP, TransportDecode, TransportLayer};
use crate::protocols::stun::is_stun;

use super::layout;

pub(crate) fn decode_udp(reader: &ByteReader<'_>, off: usize) -> Option<TransportDecode> {
    if !reader.has(off, layout::HEADER_LEN) {
        return None;
    }
    let src_port = reader.u16_be(off + layout::SRC_PORT_OFFSET)?;
    let dst_port = reader.u16_be(off + layout::DST_PORT_OFFSET)?;
    let payload = reader.tail(off + layout::HEADER_LEN);
    let l4 = TransportLayer::Udp { src_port, dst_port };

    let dns = if src_port == dns_layout::PORT || dst_port == dns_layout::PORT {
        decode_dns(payload)
    } else {
        None
    };

    if let Some(app) = lookup_port_app(layout::PORT_APPS, src_port, dst_port) {
        return Some(TransportDecode::new(l4, app.summary, app.tag).with_app(app.app_tag));
    }
    if src_port == layout::STUN_PORT || dst_port == layout::STUN_PORT || is_stun(payload) {
        return Some(TransportDecode::new(l4, "STUN", TAG_UDP).with_app("STUN/TURN"));
    }
    if let Some(app) = lookup_port_app(layout::LATE_PORT_APPS, src_port, dst_port) {
        return Some(TransportDecode::new(l4, app.summary, app.tag).with_app(app.app_tag));
    }

    if dns.is_none() {
        if let Some(kind) = sniff_rtp(payload) {
            return Some(TransportDecode::new(l4, kind, kind).with_app(kind));
        }
    }
    if src_port == layout::QUIC_PORT || dst_port == layout::QUIC_PORT {
        return Some(TransportDecode::new(l4, "QUIC", "QUIC").with_app("QUIC"));
    }

    if is_dhcp_port(src_port) || is_dhcp_port(dst_port) {
        if let Some(dhcp) = decode_dhcp(payload) {
            let meta = FrameMeta {
                dhcp: Some(dhcp.meta),
                ..FrameMeta::default()
            };
            return Some(
                TransportDecode::new(l4, dhcp.summary, TAG_UDP)
                    .with_app("DHCP")
                    .with_meta(meta),
            );
        }
    }

    Some(match dns {
        Some(DnsDecode { summary, meta }) => {
            let meta = FrameMeta {
                dns: Some(meta),
                ..FrameMeta::default()
            };
            TransportDecode::new(l4, format!("DNS {}", summary), TAG_DNS)
                .with_app(TAG_DNS)
                .with_meta(meta)
        }
        None => TransportDecode::new(l4, format!("{} → {}", src_port, dst_port), TAG_UDP),
    })
}

/// RTP version 2 heuristic; RTCP payload types are 200..=204.
fn sniff_rtp(payload: &[u8]) -> Option<&'static str> {
    let reader = ByteReader::new(payload);
    let first = reader.u8(0)?;
    let second = reader.u8(1)?;
    if first & layout::RTP_VERSION_MASK != layout::RTP_VERSION_2 {
        return None;
    }
    if layout::RTCP_PAYLOAD_TYPES.contains(&second) {
        return Some("RTCP");
    }
    reader.has(0, layout::RTP_MIN_LEN).then_some("RTP")
}
