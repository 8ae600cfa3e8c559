use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::keys::FlowKey;
use crate::analysis::rows::FrameRow;
use crate::source::RawFrame;

use super::{
    Exchange, ExchangeProtocol, ExchangeSide, ExchangeStatus, FlowEndpoints, IdAllocator,
    SideSummary, rtt_ms, tcp_payload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Sent from `endpoint_a`.
    A,
    B,
}

#[derive(Debug)]
struct Burst {
    direction: Direction,
    start_time: Option<f64>,
    end_time: Option<f64>,
    bytes: usize,
    frame_indices: Vec<usize>,
}

impl Burst {
    fn into_side(self) -> ExchangeSide {
        ExchangeSide {
            start_time: self.start_time,
            end_time: self.end_time,
            summary: SideSummary::Bytes { bytes: self.bytes },
            frame_indices: self.frame_indices,
        }
    }
}

/// Alternate-pair same-direction payload bursts in flows no other matcher
/// explained. The pairing carries no protocol meaning.
pub(crate) fn match_tcp_bursts(
    flows: &BTreeMap<&FlowKey, Vec<&FrameRow>>,
    frames: &[RawFrame<'_>],
    skip: &BTreeSet<&FlowKey>,
    burst_cap: usize,
) -> Vec<Exchange> {
    let mut ids = IdAllocator::default();
    let mut out = Vec::new();

    for (&flow_key, members) in flows {
        if skip.contains(flow_key) {
            continue;
        }
        let bursts = coalesce(flow_key, members, frames, burst_cap);
        let label = flow_key.to_string();

        let mut bursts = bursts.into_iter();
        while let (Some(request), Some(response)) = (bursts.next(), bursts.next()) {
            let rtt = rtt_ms(request.start_time, response.start_time);
            out.push(Exchange {
                id: ids.next("tcp", &label),
                protocol: ExchangeProtocol::TcpUnknown,
                flow_key: Some(flow_key.clone()),
                flow: Some(FlowEndpoints::from(flow_key)),
                request: Some(request.into_side()),
                response: Some(response.into_side()),
                rtt_ms: rtt,
                status: ExchangeStatus::LowConfidence,
            });
        }
    }
    out
}

fn coalesce(
    flow_key: &FlowKey,
    members: &[&FrameRow],
    frames: &[RawFrame<'_>],
    burst_cap: usize,
) -> Vec<Burst> {
    let mut bursts: Vec<Burst> = Vec::new();
    for &row in members {
        let Some(payload) = tcp_payload(row, frames) else {
            continue;
        };
        let direction = if row.source_endpoint().as_deref() == Some(flow_key.endpoint_a.as_str()) {
            Direction::A
        } else {
            Direction::B
        };
        let size = payload.len().min(burst_cap);

        match bursts.last_mut() {
            Some(current) if current.direction == direction => {
                current.end_time = row.timestamp;
                current.bytes += size;
                current.frame_indices.push(row.index);
            }
            _ => bursts.push(Burst {
                direction,
                start_time: row.timestamp,
                end_time: row.timestamp,
                bytes: size,
                frame_indices: vec![row.index],
            }),
        }
    }
    bursts
}
