//! Direction-independent flow and transaction keys.

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlowProtocol {
    Tcp,
    Udp,
    Dns,
}

impl FlowProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowProtocol::Tcp => "TCP",
            FlowProtocol::Udp => "UDP",
            FlowProtocol::Dns => "DNS",
        }
    }
}

impl fmt::Display for FlowProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FlowProtocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// `addr:port` endpoint string.
pub(crate) fn endpoint(addr: &str, port: u16) -> String {
    format!("{}:{}", addr, port)
}

/// The pair ordered so the byte-wise smaller string comes first.
pub(crate) fn ordered_pair(a: String, b: String) -> (String, String) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Canonical conversation key: `endpoint_a <= endpoint_b`.
///
/// # Examples
/// ```
/// use framescope_core::{FlowKey, FlowProtocol};
///
/// let forward = FlowKey::new(FlowProtocol::Tcp, "10.0.0.2", 443, "10.0.0.1", 50000);
/// let reverse = FlowKey::new(FlowProtocol::Tcp, "10.0.0.1", 50000, "10.0.0.2", 443);
/// assert_eq!(forward, reverse);
/// assert_eq!(forward.to_string(), "TCP|10.0.0.1:50000|10.0.0.2:443");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlowKey {
    pub protocol: FlowProtocol,
    pub endpoint_a: String,
    pub endpoint_b: String,
}

impl FlowKey {
    pub fn new(protocol: FlowProtocol, src: &str, src_port: u16, dst: &str, dst_port: u16) -> Self {
        let (endpoint_a, endpoint_b) =
            ordered_pair(endpoint(src, src_port), endpoint(dst, dst_port));
        Self {
            protocol,
            endpoint_a,
            endpoint_b,
        }
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.protocol, self.endpoint_a, self.endpoint_b
        )
    }
}

impl Serialize for FlowKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Protocol-specific key pairing requests with responses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionKey {
    Arp {
        spa: String,
        tpa: String,
    },
    Dns {
        id: u16,
        endpoint_a: String,
        endpoint_b: String,
    },
    TcpHandshake(FlowKey),
}

impl TransactionKey {
    pub fn dns(id: u16, src: &str, src_port: u16, dst: &str, dst_port: u16) -> Self {
        let (endpoint_a, endpoint_b) =
            ordered_pair(endpoint(src, src_port), endpoint(dst, dst_port));
        TransactionKey::Dns {
            id,
            endpoint_a,
            endpoint_b,
        }
    }
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKey::Arp { spa, tpa } => write!(f, "ARP|{}|{}", spa, tpa),
            TransactionKey::Dns {
                id,
                endpoint_a,
                endpoint_b,
            } => write!(f, "DNS|{}|{}|{}", id, endpoint_a, endpoint_b),
            TransactionKey::TcpHandshake(flow) => write!(f, "TCP-HS|{}", flow),
        }
    }
}

impl Serialize for TransactionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
