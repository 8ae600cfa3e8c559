use crate::protocols::arp::decode_arp;
use crate::protocols::common::format::format_mac;
use crate::protocols::common::reader::ByteReader;
use crate::protocols::frame::{DecodedFrame, EthernetLayer, TAG_ETH};
use crate::protocols::ip::{NetworkOutcome, decode_ipv4, decode_ipv6};

use super::layout;

struct EthernetHeader {
    l2: EthernetLayer,
    payload_offset: usize,
}

fn read_header(reader: &ByteReader<'_>) -> Option<EthernetHeader> {
    let dst_mac = format_mac(reader.slice(layout::DST_MAC_RANGE)?);
    let src_mac = format_mac(reader.slice(layout::SRC_MAC_RANGE)?);
    let (ether_type, payload_offset) = network_offset(reader)?;
    let vlan = if payload_offset == layout::VLAN_HEADER_LEN {
        reader
            .u16_be(layout::VLAN_TCI_OFFSET)
            .map(|tci| tci & layout::VLAN_ID_MASK)
    } else {
        None
    };

    Some(EthernetHeader {
        l2: EthernetLayer {
            src_mac,
            dst_mac,
            ether_type,
            vlan,
        },
        payload_offset,
    })
}

/// EtherType and L3 offset, looking through a single 802.1Q tag.
pub(crate) fn network_offset(reader: &ByteReader<'_>) -> Option<(u16, usize)> {
    if !reader.has(0, layout::HEADER_LEN) {
        return None;
    }
    let ether_type = reader.u16_be(layout::ETHER_TYPE_OFFSET)?;
    if ether_type == layout::ETHERTYPE_VLAN && reader.has(0, layout::VLAN_HEADER_LEN) {
        let inner = reader.u16_be(layout::VLAN_ETHER_TYPE_OFFSET)?;
        return Some((inner, layout::VLAN_HEADER_LEN));
    }
    Some((ether_type, layout::HEADER_LEN))
}

/// Decode an Ethernet II frame. Never fails; short input yields a `FRAME` tag.
pub fn decode_ethernet(data: &[u8]) -> DecodedFrame {
    let reader = ByteReader::new(data);
    let Some(EthernetHeader { l2, payload_offset }) = read_header(&reader) else {
        return DecodedFrame::truncated(data.len());
    };
    let off = payload_offset;

    match l2.ether_type {
        layout::ETHERTYPE_IPV4 => match decode_ipv4(&reader, off) {
            NetworkOutcome::Decoded { l3, transport } => {
                return DecodedFrame::network(Some(l2), l3, transport);
            }
            NetworkOutcome::BadHeader => {
                return DecodedFrame::link_only(l2, "IPv4 (bad header)", TAG_ETH);
            }
            NetworkOutcome::TooShort => {}
        },
        layout::ETHERTYPE_IPV6 => {
            if let NetworkOutcome::Decoded { l3, transport } = decode_ipv6(&reader, off) {
                return DecodedFrame::network(Some(l2), l3, transport);
            }
        }
        layout::ETHERTYPE_ARP => {
            if let Some(arp) = decode_arp(&reader, off) {
                return arp.into_frame(l2);
            }
        }
        _ => {}
    }

    decode_non_ip(&reader, l2, off)
}

fn decode_non_ip(reader: &ByteReader<'_>, l2: EthernetLayer, off: usize) -> DecodedFrame {
    match l2.ether_type {
        layout::ETHERTYPE_LLDP => DecodedFrame::link_only(l2, "LLDP", "LLDP"),
        layout::ETHERTYPE_MPLS_UNICAST | layout::ETHERTYPE_MPLS_MULTICAST => {
            DecodedFrame::link_only(l2, "MPLS", "MPLS")
        }
        layout::ETHERTYPE_PPPOE_DISCOVERY => {
            DecodedFrame::link_only(l2, "PPPoE Discovery", "PPPoE")
        }
        layout::ETHERTYPE_PPPOE_SESSION => DecodedFrame::link_only(l2, "PPPoE Session", "PPPoE"),
        ether_type if ether_type <= layout::MAX_8023_LENGTH => decode_llc(reader, l2, off),
        ether_type => DecodedFrame::link_only(l2, format!("Ethertype 0x{:x}", ether_type), TAG_ETH),
    }
}

fn decode_llc(reader: &ByteReader<'_>, l2: EthernetLayer, off: usize) -> DecodedFrame {
    let dsap = reader.u8(off);
    let ssap = reader.u8(off + 1);
    let control = reader.u8(off + 2);

    let is_snap = dsap == Some(layout::LLC_SNAP_SAP)
        && ssap == Some(layout::LLC_SNAP_SAP)
        && control == Some(layout::LLC_UI_CONTROL)
        && reader.has(off, layout::SNAP_HEADER_LEN);
    if is_snap {
        let oui = reader
            .array::<3>(off + layout::SNAP_OUI_OFFSET)
            .map(|b| u32::from_be_bytes([0, b[0], b[1], b[2]]));
        let pid = reader.u16_be(off + layout::SNAP_PID_OFFSET);
        if oui == Some(layout::CISCO_OUI) && pid == Some(layout::CDP_PID) {
            return DecodedFrame::link_only(l2, "CDP", "CDP");
        }
        return DecodedFrame::link_only(l2, "SNAP", "LLC");
    }
    if dsap == Some(layout::LLC_STP_SAP) && ssap == Some(layout::LLC_STP_SAP) {
        return DecodedFrame::link_only(l2, "STP BPDU", "STP");
    }
    DecodedFrame::link_only(l2, "802.3 LLC", "LLC")
}
