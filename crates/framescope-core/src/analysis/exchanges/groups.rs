use std::collections::HashMap;

use serde::Serialize;

use super::{Exchange, FlowEndpoints};

/// Exchanges sharing one flow, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeGroup {
    /// `a|b` of the flow endpoints, or the exchange id when there is no flow.
    pub group_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowEndpoints>,
    pub exchange_ids: Vec<String>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<f64>,
}

/// Reduce `exchanges` into per-flow groups ordered by first request time.
pub fn group_exchanges_by_flow(exchanges: &[Exchange]) -> Vec<ExchangeGroup> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ExchangeGroup> = Vec::new();

    for exchange in exchanges {
        let group_key = match &exchange.flow {
            Some(flow) => format!("{}|{}", flow.a, flow.b),
            None => exchange.id.clone(),
        };
        let slot = *slots.entry(group_key.clone()).or_insert_with(|| {
            groups.push(ExchangeGroup {
                group_key,
                flow: exchange.flow.clone(),
                exchange_ids: Vec::new(),
                count: 0,
                first: None,
                last: None,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.exchange_ids.push(exchange.id.clone());
        group.count += 1;
        let start = exchange.request.as_ref().and_then(|side| side.start_time);
        if let Some(start) = start {
            group.first = Some(group.first.map_or(start, |first| first.min(start)));
        }
        if let Some(end) = exchange.end_time() {
            group.last = Some(group.last.map_or(end, |last| last.max(end)));
        }
    }

    groups.sort_by(|a, b| a.first.unwrap_or(0.0).total_cmp(&b.first.unwrap_or(0.0)));
    groups
}
