use crate::analysis::keys::TransactionKey;
use crate::analysis::rows::{FrameRow, TransactionRole};
use crate::protocols::frame::TAG_DNS;

use super::pending::{Side, match_fifo};
use super::{
    Exchange, ExchangeProtocol, ExchangeSide, FlowEndpoints, IdAllocator, SideSummary, pair_status,
    rtt_ms,
};

/// Queries paired with responses on `{id, endpoint_a, endpoint_b}`.
pub(crate) fn match_dns(rows: &[FrameRow]) -> Vec<Exchange> {
    let events = rows.iter().filter_map(|row| {
        if row.protocol != TAG_DNS {
            return None;
        }
        let transaction = row.transaction.as_ref()?;
        if !matches!(transaction.key, TransactionKey::Dns { .. }) {
            return None;
        }
        let side = match transaction.role {
            TransactionRole::Query => Side::Request,
            TransactionRole::Response => Side::Response,
            _ => return None,
        };
        Some((transaction.key.clone(), side, row))
    });

    let mut ids = IdAllocator::default();
    match_fifo(events)
        .into_iter()
        .map(|pair| {
            // Either side carries the same canonical flow.
            let flow_key = pair
                .request
                .or(pair.response)
                .and_then(|row| row.flow_key.clone());
            Exchange {
                id: ids.next("dns", &pair.key.to_string()),
                protocol: ExchangeProtocol::Dns,
                flow: flow_key.as_ref().map(FlowEndpoints::from),
                flow_key,
                request: pair.request.map(side),
                response: pair.response.map(side),
                rtt_ms: rtt_ms(
                    pair.request.and_then(|row| row.timestamp),
                    pair.response.and_then(|row| row.timestamp),
                ),
                status: pair_status(pair.request.is_some(), pair.response.is_some()),
            }
        })
        .collect()
}

fn side(row: &FrameRow) -> ExchangeSide {
    let (id, name) = row
        .meta
        .dns
        .as_ref()
        .map(|dns| (dns.id, dns.name.clone()))
        .unwrap_or_default();
    ExchangeSide::single(row, SideSummary::Dns { id, name })
}
