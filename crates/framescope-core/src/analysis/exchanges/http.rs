use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::keys::FlowKey;
use crate::analysis::rows::FrameRow;
use crate::protocols::{StartLine, sniff_start_line};
use crate::source::RawFrame;

use super::{
    Exchange, ExchangeProtocol, ExchangeSide, FlowEndpoints, IdAllocator, SideSummary, pair_status,
    rtt_ms, tcp_payload,
};

/// HTTP/1.x request and response lines paired by position within each flow.
///
/// Also returns the flows that produced at least one exchange.
pub(crate) fn match_http<'k>(
    flows: &BTreeMap<&'k FlowKey, Vec<&FrameRow>>,
    frames: &[RawFrame<'_>],
    sniff_len: usize,
) -> (Vec<Exchange>, BTreeSet<&'k FlowKey>) {
    let mut ids = IdAllocator::default();
    let mut out = Vec::new();
    let mut matched = BTreeSet::new();

    for (&flow_key, members) in flows {
        let mut requests = Vec::new();
        let mut responses = Vec::new();
        for &row in members {
            let Some(payload) = tcp_payload(row, frames) else {
                continue;
            };
            let window = &payload[..payload.len().min(sniff_len)];
            match sniff_start_line(window) {
                Some(StartLine::Request { method, path, line }) => {
                    let summary = SideSummary::HttpRequest { method, path, line };
                    requests.push(ExchangeSide::single(row, summary));
                }
                Some(StartLine::Response { status, line, .. }) => {
                    let summary = SideSummary::HttpResponse { status, line };
                    responses.push(ExchangeSide::single(row, summary));
                }
                Some(StartLine::Http2Preface) | None => {}
            }
        }
        if requests.is_empty() && responses.is_empty() {
            continue;
        }

        matched.insert(flow_key);
        let label = flow_key.to_string();
        let total = requests.len().max(responses.len());
        let mut requests = requests.into_iter();
        let mut responses = responses.into_iter();
        for _ in 0..total {
            let request = requests.next();
            let response = responses.next();
            out.push(Exchange {
                id: ids.next("http", &label),
                protocol: ExchangeProtocol::Http,
                flow_key: Some(flow_key.clone()),
                flow: Some(FlowEndpoints::from(flow_key)),
                rtt_ms: rtt_ms(
                    request.as_ref().and_then(|side| side.start_time),
                    response.as_ref().and_then(|side| side.start_time),
                ),
                status: pair_status(request.is_some(), response.is_some()),
                request,
                response,
            });
        }
    }

    (out, matched)
}
