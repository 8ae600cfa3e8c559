use crate::protocols::common::ports::lookup_port_app;
use crate::protocols::common::reader::ByteReader;
use crate::protocols::frame::{
    FrameMeta, TAG_HTTP, TAG_TCP, TAG_TLS, TcpFlags, TcpMeta, TransportDecode, TransportLayer,
};
use crate::protocols::http::{DECODE_SNIFF_LEN, sniff_start_line};
use crate::protocols::stun::is_stun;
use crate::protocols::tls::sniff_client_hello;

use super::layout;

pub(crate) fn decode_tcp(reader: &ByteReader<'_>, off: usize) -> Option<TransportDecode> {
    if !reader.has(off, layout::MIN_HEADER_LEN) {
        return None;
    }
    let src_port = reader.u16_be(off + layout::SRC_PORT_OFFSET)?;
    let dst_port = reader.u16_be(off + layout::DST_PORT_OFFSET)?;
    let flags_byte = reader.u8(off + layout::FLAGS_OFFSET)?;
    let data_offset = usize::from(reader.u8(off + layout::DATA_OFFSET_OFFSET)? >> 4) * 4;
    let payload = reader.tail(off + data_offset);

    let flags = TcpFlags(flags_byte);
    let l4 = TransportLayer::Tcp {
        src_port,
        dst_port,
        flags,
    };
    let meta = FrameMeta {
        tcp: Some(TcpMeta { flags: flags_byte }),
        ..FrameMeta::default()
    };
    Some(classify(l4, payload, src_port, dst_port, flags).with_meta(meta))
}

fn classify(
    l4: TransportLayer,
    payload: &[u8],
    src_port: u16,
    dst_port: u16,
    flags: TcpFlags,
) -> TransportDecode {
    if let Some(hello) = sniff_client_hello(payload) {
        return TransportDecode::new(l4, hello.summary(), TAG_TLS).with_app(TAG_TLS);
    }

    let head = &payload[..payload.len().min(DECODE_SNIFF_LEN)];
    if let Some(line) = sniff_start_line(head) {
        let app_tag = line.app_tag();
        return TransportDecode::new(l4, line.summary(), TAG_HTTP).with_app(app_tag);
    }

    if is_stun(payload) {
        let app_tag = if src_port == layout::STUN_PORT || dst_port == layout::STUN_PORT {
            "STUN/TURN"
        } else {
            "STUN"
        };
        return TransportDecode::new(l4, "STUN", TAG_TCP).with_app(app_tag);
    }

    if let Some(app) = lookup_port_app(layout::PORT_APPS, src_port, dst_port) {
        return TransportDecode::new(l4, app.summary, app.tag).with_app(app.app_tag);
    }

    let summary = format!("{} → {} [{}]", src_port, dst_port, flags);
    TransportDecode::new(l4, summary, TAG_TCP)
}
