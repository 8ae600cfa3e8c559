//! Per-frame rows: the decoded view plus flow and transaction keys.

use serde::Serialize;

use crate::protocols::arp::{OP_REPLY, OP_REQUEST};
use crate::protocols::frame::{TAG_ARP, TAG_DNS, TcpFlags, TransportLayer};
use crate::protocols::{DecodedFrame, FrameMeta, decode};
use crate::source::RawFrame;

use super::keys::{FlowKey, FlowProtocol, TransactionKey, endpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionRole {
    Request,
    Reply,
    Other,
    Query,
    Response,
    Syn,
    SynAck,
    Ack,
    Fin,
    Rst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub key: TransactionKey,
    pub role: TransactionRole,
}

/// One captured frame as seen by the correlator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    /// 1-based position in the capture.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    pub captured_length: u32,
    pub original_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_port: Option<u16>,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_tag: Option<String>,
    pub info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_key: Option<FlowKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    #[serde(skip_serializing_if = "FrameMeta::is_empty")]
    pub meta: FrameMeta,
}

impl FrameRow {
    pub fn new(index: usize, frame: &RawFrame<'_>, decoded: DecodedFrame) -> Self {
        let src = decoded.src().map(str::to_string);
        let dst = decoded.dst().map(str::to_string);
        let ports = decoded.l4.as_ref().and_then(TransportLayer::ports);
        let flow_key = flow_key_for(&decoded, src.as_deref(), dst.as_deref());
        let transaction = transaction_for(&decoded, src.as_deref(), dst.as_deref(), &flow_key);

        Self {
            index,
            timestamp: frame.timestamp,
            captured_length: frame.captured_length,
            original_length: frame.original_length,
            interface_index: frame.interface_index,
            src,
            dst,
            src_port: ports.map(|(sp, _)| sp),
            dst_port: ports.map(|(_, dp)| dp),
            protocol: decoded.protocol_tag,
            app_tag: decoded.app_tag,
            info: decoded.summary,
            flow_key,
            transaction,
            meta: decoded.meta,
        }
    }

    /// `src:src_port`, when both are known.
    pub fn source_endpoint(&self) -> Option<String> {
        Some(endpoint(self.src.as_deref()?, self.src_port?))
    }
}

/// Decode every frame into a row, numbering from 1.
pub fn build_rows(frames: &[RawFrame<'_>]) -> Vec<FrameRow> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| FrameRow::new(i + 1, frame, decode(frame)))
        .collect()
}

fn flow_key_for(decoded: &DecodedFrame, src: Option<&str>, dst: Option<&str>) -> Option<FlowKey> {
    let (protocol, src_port, dst_port) = match decoded.l4.as_ref()? {
        TransportLayer::Tcp {
            src_port, dst_port, ..
        } => (FlowProtocol::Tcp, *src_port, *dst_port),
        TransportLayer::Udp { src_port, dst_port } => {
            let protocol = if decoded.protocol_tag == TAG_DNS {
                FlowProtocol::Dns
            } else {
                FlowProtocol::Udp
            };
            (protocol, *src_port, *dst_port)
        }
        TransportLayer::Icmpv4 { .. } | TransportLayer::Icmpv6 { .. } => return None,
    };
    Some(FlowKey::new(protocol, src?, src_port, dst?, dst_port))
}

fn transaction_for(
    decoded: &DecodedFrame,
    src: Option<&str>,
    dst: Option<&str>,
    flow_key: &Option<FlowKey>,
) -> Option<Transaction> {
    if decoded.protocol_tag == TAG_ARP {
        let arp = decoded.meta.arp.as_ref()?;
        let role = match arp.op {
            OP_REQUEST => TransactionRole::Request,
            OP_REPLY => TransactionRole::Reply,
            _ => TransactionRole::Other,
        };
        return Some(Transaction {
            key: TransactionKey::Arp {
                spa: arp.spa.clone(),
                tpa: arp.tpa.clone(),
            },
            role,
        });
    }

    if decoded.protocol_tag == TAG_DNS {
        let dns = decoded.meta.dns.as_ref()?;
        let (src_port, dst_port) = decoded.l4.as_ref()?.ports()?;
        let role = if dns.qr {
            TransactionRole::Response
        } else {
            TransactionRole::Query
        };
        return Some(Transaction {
            key: TransactionKey::dns(dns.id, src?, src_port, dst?, dst_port),
            role,
        });
    }

    let tcp = decoded.meta.tcp.as_ref()?;
    let flow = flow_key.as_ref()?;
    Some(Transaction {
        key: TransactionKey::TcpHandshake(flow.clone()),
        role: handshake_role(TcpFlags(tcp.flags))?,
    })
}

fn handshake_role(flags: TcpFlags) -> Option<TransactionRole> {
    let syn = flags.contains(TcpFlags::SYN);
    let ack = flags.contains(TcpFlags::ACK);
    let fin = flags.contains(TcpFlags::FIN);
    let rst = flags.contains(TcpFlags::RST);
    if syn && !ack {
        Some(TransactionRole::Syn)
    } else if syn && ack {
        Some(TransactionRole::SynAck)
    } else if ack && !rst && !fin {
        Some(TransactionRole::Ack)
    } else if fin {
        Some(TransactionRole::Fin)
    } else if rst {
        Some(TransactionRole::Rst)
    } else {
        None
    }
}
