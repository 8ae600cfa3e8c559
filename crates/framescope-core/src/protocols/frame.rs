//! Decoded frame model shared by every layer decoder.

use std::fmt;

use serde::{Serialize, Serializer};

pub const TAG_FRAME: &str = "FRAME";
pub const TAG_ETH: &str = "ETH";
pub const TAG_ARP: &str = "ARP";
pub const TAG_TCP: &str = "TCP";
pub const TAG_UDP: &str = "UDP";
pub const TAG_DNS: &str = "DNS";
pub const TAG_TLS: &str = "TLS";
pub const TAG_HTTP: &str = "HTTP";

/// Ethernet II header, with the 802.1Q VLAN id when tagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EthernetLayer {
    pub src_mac: String,
    pub dst_mac: String,
    pub ether_type: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "proto")]
pub enum NetworkLayer {
    #[serde(rename = "IPv4")]
    Ipv4 {
        src: String,
        dst: String,
        protocol: u8,
    },
    #[serde(rename = "IPv6")]
    Ipv6 {
        src: String,
        dst: String,
        next_header: u8,
    },
    /// Sender and target protocol addresses.
    #[serde(rename = "ARP")]
    Arp { src: String, dst: String },
}

impl NetworkLayer {
    pub fn src(&self) -> &str {
        match self {
            NetworkLayer::Ipv4 { src, .. }
            | NetworkLayer::Ipv6 { src, .. }
            | NetworkLayer::Arp { src, .. } => src,
        }
    }

    pub fn dst(&self) -> &str {
        match self {
            NetworkLayer::Ipv4 { dst, .. }
            | NetworkLayer::Ipv6 { dst, .. }
            | NetworkLayer::Arp { dst, .. } => dst,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NetworkLayer::Ipv4 { .. } => "IPv4",
            NetworkLayer::Ipv6 { .. } => "IPv6",
            NetworkLayer::Arp { .. } => "ARP",
        }
    }
}

/// TCP control bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TcpFlags(pub u8);

impl TcpFlags {
    pub const FIN: u8 = 0x01;
    pub const SYN: u8 = 0x02;
    pub const RST: u8 = 0x04;
    pub const PSH: u8 = 0x08;
    pub const ACK: u8 = 0x10;
    pub const URG: u8 = 0x20;
    pub const ECE: u8 = 0x40;
    pub const CWR: u8 = 0x80;

    const NAMES: [(u8, &'static str); 8] = [
        (Self::FIN, "FIN"),
        (Self::SYN, "SYN"),
        (Self::RST, "RST"),
        (Self::PSH, "PSH"),
        (Self::ACK, "ACK"),
        (Self::URG, "URG"),
        (Self::ECE, "ECE"),
        (Self::CWR, "CWR"),
    ];

    pub fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

impl fmt::Display for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join(","))
        }
    }
}

impl Serialize for TcpFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "proto")]
pub enum TransportLayer {
    #[serde(rename = "TCP")]
    Tcp {
        src_port: u16,
        dst_port: u16,
        flags: TcpFlags,
    },
    #[serde(rename = "UDP")]
    Udp { src_port: u16, dst_port: u16 },
    #[serde(rename = "ICMPv4")]
    Icmpv4 { icmp_type: u8, code: u8 },
    #[serde(rename = "ICMPv6")]
    Icmpv6 { icmp_type: u8, code: u8 },
}

impl TransportLayer {
    pub fn ports(&self) -> Option<(u16, u16)> {
        match self {
            TransportLayer::Tcp {
                src_port, dst_port, ..
            }
            | TransportLayer::Udp { src_port, dst_port } => Some((*src_port, *dst_port)),
            TransportLayer::Icmpv4 { .. } | TransportLayer::Icmpv6 { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransportLayer::Tcp { .. } => "TCP",
            TransportLayer::Udp { .. } => "UDP",
            TransportLayer::Icmpv4 { .. } => "ICMPv4",
            TransportLayer::Icmpv6 { .. } => "ICMPv6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArpMeta {
    pub op: u16,
    pub spa: String,
    pub tpa: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsMeta {
    pub id: u16,
    pub qr: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qtype: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qtype_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TcpMeta {
    pub flags: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EchoMeta {
    pub id: u16,
    pub seq: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IcmpMeta {
    pub icmp_type: u8,
    pub code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<EchoMeta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DhcpMeta {
    pub op: u8,
    pub xid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<u8>,
}

/// Protocol-specific fields consumed by the exchange correlator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arp: Option<ArpMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<TcpMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icmp: Option<IcmpMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<DhcpMeta>,
}

impl FrameMeta {
    pub fn is_empty(&self) -> bool {
        self.arp.is_none()
            && self.dns.is_none()
            && self.tcp.is_none()
            && self.icmp.is_none()
            && self.dhcp.is_none()
    }
}

/// Layered view of one frame.
///
/// # Examples
/// ```
/// use framescope_core::decode_ethernet;
///
/// let decoded = decode_ethernet(&[0u8; 10]);
/// assert_eq!(decoded.protocol_tag, "FRAME");
/// assert_eq!(decoded.summary, "Truncated frame (10B)");
/// assert!(decoded.l2.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l2: Option<EthernetLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l3: Option<NetworkLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l4: Option<TransportLayer>,
    pub summary: String,
    pub protocol_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_tag: Option<String>,
    #[serde(skip_serializing_if = "FrameMeta::is_empty")]
    pub meta: FrameMeta,
}

impl DecodedFrame {
    pub(crate) fn truncated(len: usize) -> Self {
        Self::bare(format!("Truncated frame ({}B)", len), TAG_FRAME)
    }

    pub(crate) fn bare(summary: String, tag: &str) -> Self {
        Self {
            l2: None,
            l3: None,
            l4: None,
            summary,
            protocol_tag: tag.to_string(),
            app_tag: None,
            meta: FrameMeta::default(),
        }
    }

    pub(crate) fn link_only(l2: EthernetLayer, summary: impl Into<String>, tag: &str) -> Self {
        Self {
            l2: Some(l2),
            ..Self::bare(summary.into(), tag)
        }
    }

    pub(crate) fn network(
        l2: Option<EthernetLayer>,
        l3: NetworkLayer,
        transport: TransportDecode,
    ) -> Self {
        Self {
            l2,
            l3: Some(l3),
            l4: transport.l4,
            summary: transport.summary,
            protocol_tag: transport.tag,
            app_tag: transport.app_tag,
            meta: transport.meta,
        }
    }

    /// L3 source address, else the source MAC.
    pub fn src(&self) -> Option<&str> {
        self.l3
            .as_ref()
            .map(NetworkLayer::src)
            .or_else(|| self.l2.as_ref().map(|l2| l2.src_mac.as_str()))
    }

    /// L3 destination address, else the destination MAC.
    pub fn dst(&self) -> Option<&str> {
        self.l3
            .as_ref()
            .map(NetworkLayer::dst)
            .or_else(|| self.l2.as_ref().map(|l2| l2.dst_mac.as_str()))
    }
}

/// Result of the transport-layer decode, merged into a [`DecodedFrame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransportDecode {
    pub l4: Option<TransportLayer>,
    pub summary: String,
    pub tag: String,
    pub app_tag: Option<String>,
    pub meta: FrameMeta,
}

impl TransportDecode {
    /// Name-table fallback: no L4 fields, summary and tag are the name.
    pub(crate) fn named(name: String) -> Self {
        Self {
            l4: None,
            tag: name.clone(),
            summary: name,
            app_tag: None,
            meta: FrameMeta::default(),
        }
    }

    pub(crate) fn new(l4: TransportLayer, summary: impl Into<String>, tag: &str) -> Self {
        Self {
            l4: Some(l4),
            summary: summary.into(),
            tag: tag.to_string(),
            app_tag: None,
            meta: FrameMeta::default(),
        }
    }

    pub(crate) fn with_app(mut self, app_tag: &str) -> Self {
        self.app_tag = Some(app_tag.to_string());
        self
    }

    pub(crate) fn with_meta(mut self, meta: FrameMeta) -> Self {
        self.meta = meta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameMeta, TcpFlags, TcpMeta};

    #[test]
    fn tcp_flags_render_in_bit_order() {
        assert_eq!(TcpFlags(0x12).to_string(), "SYN,ACK");
        assert_eq!(TcpFlags(0x02).to_string(), "SYN");
        assert_eq!(TcpFlags(0x11).to_string(), "FIN,ACK");
        assert_eq!(TcpFlags(0).to_string(), "NONE");
        assert_eq!(
            TcpFlags(0xff).to_string(),
            "FIN,SYN,RST,PSH,ACK,URG,ECE,CWR"
        );
    }

    #[test]
    fn meta_emptiness() {
        assert!(FrameMeta::default().is_empty());
        let meta = FrameMeta {
            tcp: Some(TcpMeta { flags: 2 }),
            ..FrameMeta::default()
        };
        assert!(!meta.is_empty());
    }
}
