use crate::analysis::keys::ordered_pair;
use crate::analysis::rows::FrameRow;
use crate::protocols::icmp::{EchoKind, echo_kind};
use crate::protocols::ip::IpVersion;

use super::pending::{Side, match_fifo};
use super::{
    Exchange, ExchangeProtocol, ExchangeSide, FlowEndpoints, IdAllocator, SideSummary, pair_status,
    rtt_ms,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct EchoKey {
    a: String,
    b: String,
    id: u16,
    seq: u16,
}

impl EchoKey {
    fn label(&self) -> String {
        format!("{}|{}|{}|{}", self.a, self.b, self.id, self.seq)
    }
}

/// Echo requests paired with replies on the address pair plus id and seq.
pub(crate) fn match_icmp_echo(rows: &[FrameRow]) -> Vec<Exchange> {
    let events = rows.iter().filter_map(|row| {
        let version = match row.protocol.as_str() {
            "ICMPv4" => IpVersion::V4,
            "ICMPv6" => IpVersion::V6,
            _ => return None,
        };
        let icmp = row.meta.icmp.as_ref()?;
        let echo = icmp.echo.as_ref()?;
        let side = match echo_kind(version, icmp.icmp_type)? {
            EchoKind::Request => Side::Request,
            EchoKind::Reply => Side::Response,
        };
        let (a, b) = ordered_pair(row.src.clone()?, row.dst.clone()?);
        let key = EchoKey {
            a,
            b,
            id: echo.id,
            seq: echo.seq,
        };
        Some((key, side, row))
    });

    let mut ids = IdAllocator::default();
    match_fifo(events)
        .into_iter()
        .map(|pair| {
            let summary = SideSummary::IcmpEcho {
                id: pair.key.id,
                seq: pair.key.seq,
            };
            Exchange {
                id: ids.next("icmp", &pair.key.label()),
                protocol: ExchangeProtocol::IcmpEcho,
                flow_key: None,
                flow: Some(FlowEndpoints {
                    a: pair.key.a.clone(),
                    b: pair.key.b.clone(),
                }),
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
