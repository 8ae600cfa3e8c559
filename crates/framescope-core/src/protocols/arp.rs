//! ARP over Ethernet/IPv4.

use super::common::format::{format_ipv4, format_mac};
use super::common::reader::ByteReader;
use super::frame::{ArpMeta, DecodedFrame, EthernetLayer, FrameMeta, NetworkLayer, TAG_ARP};

const PACKET_LEN: usize = 28;
const OPERATION_OFFSET: usize = 6;
const SENDER_HW_OFFSET: usize = 8;
const SENDER_PROTO_OFFSET: usize = 14;
const TARGET_PROTO_OFFSET: usize = 24;

pub const OP_REQUEST: u16 = 1;
pub const OP_REPLY: u16 = 2;

pub(crate) struct ArpDecode {
    summary: String,
    meta: ArpMeta,
}

impl ArpDecode {
    pub(crate) fn into_frame(self, l2: EthernetLayer) -> DecodedFrame {
        let l3 = NetworkLayer::Arp {
            src: self.meta.spa.clone(),
            dst: self.meta.tpa.clone(),
        };
        let mut frame = DecodedFrame::link_only(l2, self.summary, TAG_ARP);
        frame.l3 = Some(l3);
        frame.meta = FrameMeta {
            arp: Some(self.meta),
            ..FrameMeta::default()
        };
        frame
    }
}

pub(crate) fn decode_arp(reader: &ByteReader<'_>, off: usize) -> Option<ArpDecode> {
    if !reader.has(off, PACKET_LEN) {
        return None;
    }
    let op = reader.u16_be(off + OPERATION_OFFSET)?;
    let spa = format_ipv4(reader.array::<4>(off + SENDER_PROTO_OFFSET)?);
    let tpa = format_ipv4(reader.array::<4>(off + TARGET_PROTO_OFFSET)?);

    let summary = match op {
        OP_REQUEST => format!("ARP Who has {}? Tell {}", tpa, spa),
        OP_REPLY => {
            let sha = format_mac(reader.slice_len(off + SENDER_HW_OFFSET, 6)?);
            format!("ARP Reply {} is-at {}", spa, sha)
        }
        _ => "ARP".to_string(),
    };

    Some(ArpDecode {
        summary,
        meta: ArpMeta { op, spa, tpa },
    })
}
