use std::ops::Range;

pub const HEADER_LEN: usize = 14;
pub const DST_MAC_RANGE: Range<usize> = 0..6;
pub const SRC_MAC_RANGE: Range<usize> = 6..12;
pub const ETHER_TYPE_OFFSET: usize = 12;

pub const VLAN_HEADER_LEN: usize = 18;
pub const VLAN_TCI_OFFSET: usize = 14;
pub const VLAN_ETHER_TYPE_OFFSET: usize = 16;
pub const VLAN_ID_MASK: u16 = 0x0fff;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_ARP: u16 = 0x0806;
pub const ETHERTYPE_VLAN: u16 = 0x8100;
pub const ETHERTYPE_IPV6: u16 = 0x86dd;
pub const ETHERTYPE_MPLS_UNICAST: u16 = 0x8847;
pub const ETHERTYPE_MPLS_MULTICAST: u16 = 0x8848;
pub const ETHERTYPE_PPPOE_DISCOVERY: u16 = 0x8863;
pub const ETHERTYPE_PPPOE_SESSION: u16 = 0x8864;
pub const ETHERTYPE_LLDP: u16 = 0x88cc;
/// Values up to this are an 802.3 length field, not an EtherType.
pub const MAX_8023_LENGTH: u16 = 1500;

pub const LLC_SNAP_SAP: u8 = 0xaa;
pub const LLC_UI_CONTROL: u8 = 0x03;
pub const LLC_STP_SAP: u8 = 0x42;
/// DSAP, SSAP, control, OUI and protocol id.
pub const SNAP_HEADER_LEN: usize = 8;
pub const SNAP_OUI_OFFSET: usize = 3;
pub const SNAP_PID_OFFSET: usize = 6;
pub const CISCO_OUI: u32 = 0x0000_000c;
pub const CDP_PID: u16 = 0x2000;
