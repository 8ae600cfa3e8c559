use crate::analysis::keys::TransactionKey;
use crate::analysis::rows::{FrameRow, TransactionRole};
use crate::protocols::frame::TAG_ARP;

use super::pending::{Side, match_fifo};
use super::{
    Exchange, ExchangeProtocol, ExchangeSide, FlowEndpoints, IdAllocator, SideSummary, pair_status,
    rtt_ms,
};

/// Who-has requests paired with is-at replies on `{spa, tpa}`.
pub(crate) fn match_arp(rows: &[FrameRow]) -> Vec<Exchange> {
    let events = rows.iter().filter_map(|row| {
        if row.protocol != TAG_ARP {
            return None;
        }
        let transaction = row.transaction.as_ref()?;
        let (spa, tpa) = match &transaction.key {
            TransactionKey::Arp { spa, tpa } => (spa.clone(), tpa.clone()),
            _ => return None,
        };
        let side = match transaction.role {
            TransactionRole::Request => Side::Request,
            TransactionRole::Reply => Side::Response,
            _ => return None,
        };
        Some(((spa, tpa), side, row))
    });

    let mut ids = IdAllocator::default();
    match_fifo(events)
        .into_iter()
        .map(|pair| {
            let (spa, tpa) = pair.key;
            let key = TransactionKey::Arp {
                spa: spa.clone(),
                tpa: tpa.clone(),
            };
            let summary = SideSummary::Arp {
                spa: spa.clone(),
                tpa: tpa.clone(),
            };
            Exchange {
                id: ids.next("arp", &key.to_string()),
                protocol: ExchangeProtocol::Arp,
                flow_key: None,
                flow: Some(FlowEndpoints { a: spa, b: tpa }),
                request: pair
                    .request
                    .map(|row| ExchangeSide::single(row, summary.clone())),
                response: pair.response.map(|row| ExchangeSide::single(row, summary)),
                rtt_ms: rtt_ms(
                    pair.request.and_then(|row| row.timestamp),
                    pair.response.and_then(|row| row.timestamp),
                ),
                status: pair_status(pair.request.is_some(), pair.response.is_some()),
            }
        })
        .collect()
}
