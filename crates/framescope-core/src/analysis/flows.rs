use std::collections::BTreeMap;

use crate::FlowSummary;

use super::keys::FlowKey;
use super::rows::FrameRow;

#[derive(Debug, Default, Clone)]
pub(crate) struct FlowStats {
    pub packets: u64,
    pub bytes: u64,
}

pub(crate) fn add_flow_stats(stats: &mut BTreeMap<FlowKey, FlowStats>, row: &FrameRow) {
    let Some(key) = row.flow_key.as_ref() else {
        return;
    };
    let entry = stats.entry(key.clone()).or_default();
    entry.packets += 1;
    entry.bytes += u64::from(row.captured_length);
}

pub(crate) fn build_flow_summaries(
    stats: BTreeMap<FlowKey, FlowStats>,
    duration_s: Option<f64>,
) -> Vec<FlowSummary> {
    let duration_s = duration_s.filter(|d| *d > 0.0);
    stats
        .into_iter()
        .map(|(key, stats)| {
            let rate = |count: u64| duration_s.map(|secs| count as f64 / secs);
            FlowSummary {
                protocol: key.protocol.as_str().to_string(),
                endpoint_a: key.endpoint_a.clone(),
                endpoint_b: key.endpoint_b.clone(),
                flow_key: key,
                packets: stats.packets,
                bytes: stats.bytes,
                pps: rate(stats.packets),
                bps: rate(stats.bytes),
            }
        })
        .collect()
}
