//! Exchange correlator.
//!
//! Each matcher pairs requests with responses for one protocol. Results are
//! unioned and ordered by request start time; frames lacking a request sort
//! as time 0 and ties keep matcher order.

mod arp;
mod bursts;
mod dhcp;
mod dns;
mod groups;
mod http;
mod icmp;
mod pending;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::analysis::config::CorrelationConfig;
use crate::analysis::keys::{FlowKey, FlowProtocol};
use crate::analysis::rows::FrameRow;
use crate::protocols::{PayloadTransport, extract_frame_payload};
use crate::source::RawFrame;

pub use groups::{ExchangeGroup, group_exchanges_by_flow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExchangeProtocol {
    Arp,
    Dns,
    Http,
    TcpUnknown,
    IcmpEcho,
    Dhcp,
}

impl ExchangeProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeProtocol::Arp => "arp",
            ExchangeProtocol::Dns => "dns",
            ExchangeProtocol::Http => "http",
            ExchangeProtocol::TcpUnknown => "tcp-unknown",
            ExchangeProtocol::IcmpEcho => "icmp-echo",
            ExchangeProtocol::Dhcp => "dhcp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExchangeStatus {
    Complete,
    Partial,
    LowConfidence,
}

impl ExchangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeStatus::Complete => "complete",
            ExchangeStatus::Partial => "partial",
            ExchangeStatus::LowConfidence => "low-confidence",
        }
    }
}

/// What one side of an exchange carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SideSummary {
    Arp {
        spa: String,
        tpa: String,
    },
    Dns {
        id: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    HttpRequest {
        method: String,
        path: String,
        line: String,
    },
    HttpResponse {
        status: u16,
        line: String,
    },
    IcmpEcho {
        id: u16,
        seq: u16,
    },
    Dhcp {
        xid: u32,
        op: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        message_type: Option<u8>,
    },
    Bytes {
        bytes: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeSide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    pub summary: SideSummary,
    /// 1-based frame indices.
    pub frame_indices: Vec<usize>,
}

impl ExchangeSide {
    pub(crate) fn single(row: &FrameRow, summary: SideSummary) -> Self {
        Self {
            start_time: row.timestamp,
            end_time: row.timestamp,
            summary,
            frame_indices: vec![row.index],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEndpoints {
    pub a: String,
    pub b: String,
}

impl From<&FlowKey> for FlowEndpoints {
    fn from(key: &FlowKey) -> Self {
        Self {
            a: key.endpoint_a.clone(),
            b: key.endpoint_b.clone(),
        }
    }
}

/// A correlated request/response pair, or one unmatched half.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    pub id: String,
    pub protocol: ExchangeProtocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_key: Option<FlowKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowEndpoints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<ExchangeSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ExchangeSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtt_ms: Option<f64>,
    pub status: ExchangeStatus,
}

impl Exchange {
    /// Request start time, or 0 when there is none.
    pub fn start_time(&self) -> f64 {
        self.request
            .as_ref()
            .and_then(|side| side.start_time)
            .unwrap_or(0.0)
    }

    /// Latest time this exchange covers.
    pub fn end_time(&self) -> Option<f64> {
        self.response
            .as_ref()
            .and_then(|side| side.end_time)
            .or_else(|| self.request.as_ref().and_then(|side| side.end_time))
    }
}

/// Run every matcher over `rows` and return the time-ordered union.
///
/// `frames` are the raw frames the rows were decoded from, in the same
/// order; the HTTP and burst matchers read payload bytes from them.
pub fn build_exchanges(
    rows: &[FrameRow],
    frames: &[RawFrame<'_>],
    config: &CorrelationConfig,
) -> Vec<Exchange> {
    let mut out = Vec::new();
    if rows.is_empty() {
        return out;
    }

    out.extend(arp::match_arp(rows));
    out.extend(dns::match_dns(rows));
    out.extend(icmp::match_icmp_echo(rows));
    out.extend(dhcp::match_dhcp(rows));

    let flows = tcp_flows(rows);
    let (http, http_flows) = http::match_http(&flows, frames, config.http_sniff_len);
    out.extend(http);
    out.extend(bursts::match_tcp_bursts(
        &flows,
        frames,
        &http_flows,
        config.tcp_burst_cap,
    ));

    out.sort_by(|a, b| a.start_time().total_cmp(&b.start_time()));
    debug!(
        rows = rows.len(),
        tcp_flows = flows.len(),
        exchanges = out.len(),
        "exchange correlation finished"
    );
    out
}

/// Hands out `<proto>:<key>#<n>` ids, counting per prefix and key.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    seen: HashMap<String, usize>,
}

impl IdAllocator {
    pub(crate) fn next(&mut self, prefix: &str, key: &str) -> String {
        let base = format!("{}:{}", prefix, key);
        let n = self.seen.entry(base.clone()).or_insert(0);
        *n += 1;
        format!("{}#{}", base, n)
    }
}

/// `(response - request) * 1000`, floored at zero, when both are known.
pub(crate) fn rtt_ms(request: Option<f64>, response: Option<f64>) -> Option<f64> {
    Some(((response? - request?) * 1000.0).max(0.0))
}

pub(crate) fn pair_status(request: bool, response: bool) -> ExchangeStatus {
    if request && response {
        ExchangeStatus::Complete
    } else {
        ExchangeStatus::Partial
    }
}

/// Rows of each TCP flow, sorted by timestamp then index.
pub(crate) fn tcp_flows(rows: &[FrameRow]) -> BTreeMap<&FlowKey, Vec<&FrameRow>> {
    let mut flows: BTreeMap<&FlowKey, Vec<&FrameRow>> = BTreeMap::new();
    for row in rows {
        if let Some(key) = row.flow_key.as_ref() {
            if key.protocol == FlowProtocol::Tcp {
                flows.entry(key).or_default().push(row);
            }
        }
    }
    for members in flows.values_mut() {
        members.sort_by(|a, b| {
            let ta = a.timestamp.unwrap_or(0.0);
            let tb = b.timestamp.unwrap_or(0.0);
            ta.total_cmp(&tb).then_with(|| a.index.cmp(&b.index))
        });
    }
    flows
}

/// Non-empty TCP payload of the frame behind `row`.
pub(crate) fn tcp_payload<'a>(row: &FrameRow, frames: &[RawFrame<'a>]) -> Option<&'a [u8]> {
    let frame = frames.get(row.index.checked_sub(1)?)?;
    let range = extract_frame_payload(frame)?;
    if range.transport != PayloadTransport::Tcp || range.length == 0 {
        return None;
    }
    Some(range.slice(frame.data))
}
