use std::collections::BTreeMap;

use crate::analysis::keys::{endpoint, ordered_pair};
use crate::analysis::rows::FrameRow;
use crate::protocols::DhcpMeta;

use super::{
    Exchange, ExchangeProtocol, ExchangeSide, FlowEndpoints, IdAllocator, SideSummary, pair_status,
    rtt_ms,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct DhcpKey {
    a: String,
    b: String,
    xid: u32,
}

/// Messages sharing an endpoint pair and xid, taken two at a time.
///
/// This does not follow the DHCP state machine: a Discover/Offer on distinct
/// addresses will not pair, and any two messages of one key will.
pub(crate) fn match_dhcp(rows: &[FrameRow]) -> Vec<Exchange> {
    let mut by_key: BTreeMap<DhcpKey, Vec<(&FrameRow, &DhcpMeta)>> = BTreeMap::new();
    for row in rows {
        let Some(dhcp) = row.meta.dhcp.as_ref() else {
            continue;
        };
        let (Some(src), Some(dst)) = (row.source_endpoint(), destination(row)) else {
            continue;
        };
        let (a, b) = ordered_pair(src, dst);
        by_key
            .entry(DhcpKey {
                a,
                b,
                xid: dhcp.xid,
            })
            .or_default()
            .push((row, dhcp));
    }

    let mut ids = IdAllocator::default();
    let mut out = Vec::new();
    for (key, messages) in by_key {
        let label = format!("{}|{}|0x{:08x}", key.a, key.b, key.xid);
        for chunk in messages.chunks(2) {
            let request = chunk.first().copied();
            let response = chunk.get(1).copied();
            out.push(Exchange {
                id: ids.next("dhcp", &label),
                protocol: ExchangeProtocol::Dhcp,
                flow_key: request.and_then(|(row, _)| row.flow_key.clone()),
                flow: Some(FlowEndpoints {
                    a: key.a.clone(),
                    b: key.b.clone(),
                }),
                request: request.map(side),
                response: response.map(side),
                rtt_ms: rtt_ms(
                    request.and_then(|(row, _)| row.timestamp),
                    response.and_then(|(row, _)| row.timestamp),
                ),
                status: pair_status(request.is_some(), response.is_some()),
            });
        }
    }
    out
}

fn destination(row: &FrameRow) -> Option<String> {
    Some(endpoint(row.dst.as_deref()?, row.dst_port?))
}

fn side((row, dhcp): (&FrameRow, &DhcpMeta)) -> ExchangeSide {
    let summary = SideSummary::Dhcp {
        xid: dhcp.xid,
        op: dhcp.op,
        message_type: dhcp.message_type,
    };
    ExchangeSide::single(row, summary)
}
