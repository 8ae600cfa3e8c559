//! BOOTP/DHCP header sniffing.

use super::common::reader::ByteReader;
use super::frame::DhcpMeta;

pub const SERVER_PORT: u16 = 67;
pub const CLIENT_PORT: u16 = 68;

const OP_OFFSET: usize = 0;
const XID_OFFSET: usize = 4;
const MAGIC_COOKIE_OFFSET: usize = 236;
const MAGIC_COOKIE: u32 = 0x6382_5363;
const OPTIONS_OFFSET: usize = 240;
const OPTION_PAD: u8 = 0;
const OPTION_MESSAGE_TYPE: u8 = 53;
const OPTION_END: u8 = 255;

pub(crate) struct DhcpDecode {
    pub summary: String,
    pub meta: DhcpMeta,
}

pub(crate) fn is_dhcp_port(port: u16) -> bool {
    port == SERVER_PORT || port == CLIENT_PORT
}

pub(crate) fn decode_dhcp(payload: &[u8]) -> Option<DhcpDecode> {
    let reader = ByteReader::new(payload);
    if !reader.has(0, OPTIONS_OFFSET) || reader.u32_be(MAGIC_COOKIE_OFFSET)? != MAGIC_COOKIE {
        return None;
    }
    let op = reader.u8(OP_OFFSET)?;
    let xid = reader.u32_be(XID_OFFSET)?;
    let message_type = message_type(&reader);

    let name = match message_type.and_then(message_type_name) {
        Some(name) => name,
        None => op_name(op),
    };
    Some(DhcpDecode {
        summary: format!("DHCP {} xid=0x{:08x}", name, xid),
        meta: DhcpMeta {
            op,
            xid,
            message_type,
        },
    })
}

fn message_type(reader: &ByteReader<'_>) -> Option<u8> {
    let mut p = OPTIONS_OFFSET;
    loop {
        let code = reader.u8(p)?;
        match code {
            OPTION_END => return None,
            OPTION_PAD => p += 1,
            _ => {
                let len = usize::from(reader.u8(p + 1)?);
                if code == OPTION_MESSAGE_TYPE && len >= 1 {
                    return reader.u8(p + 2);
                }
                p += 2 + len;
            }
        }
    }
}

fn message_type_name(message_type: u8) -> Option<&'static str> {
    Some(match message_type {
        1 => "Discover",
        2 => "Offer",
        3 => "Request",
        4 => "Decline",
        5 => "ACK",
        6 => "NAK",
        7 => "Release",
        8 => "Inform",
        _ => return None,
    })
}

fn op_name(op: u8) -> &'static str {
    match op {
        1 => "BOOTREQUEST",
        2 => "BOOTREPLY",
        _ => "message",
    }
}
