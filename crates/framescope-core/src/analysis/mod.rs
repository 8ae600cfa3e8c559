use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

use crate::source::{Capture, CaptureFile, SourceError};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, ProtocolCount, Report, make_stub_report};

mod config;
mod exchanges;
mod flows;
mod keys;
mod rows;

pub use config::{
    AnalysisConfig, CorrelationConfig, DEFAULT_HTTP_SNIFF_LEN, DEFAULT_TCP_BURST_CAP,
};
pub use exchanges::{
    Exchange, ExchangeGroup, ExchangeProtocol, ExchangeSide, ExchangeStatus, FlowEndpoints,
    SideSummary, build_exchanges, group_exchanges_by_flow,
};
pub use keys::{FlowKey, FlowProtocol, TransactionKey};
pub use rows::{FrameRow, Transaction, TransactionRole, build_rows};

use flows::{FlowStats, add_flow_stats, build_flow_summaries};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Read, decode and correlate one capture file.
pub fn analyze_capture_file(path: &Path, config: &AnalysisConfig) -> Result<Report, AnalysisError> {
    let file = CaptureFile::open(path)?;
    let capture = file.capture()?;
    let input_bytes = path.metadata()?.len();
    Ok(analyze_capture(
        &path.display().to_string(),
        input_bytes,
        &capture,
        config,
    ))
}

/// Build a report for an already parsed capture.
pub fn analyze_capture(
    input_path: &str,
    input_bytes: u64,
    capture: &Capture<'_>,
    config: &AnalysisConfig,
) -> Report {
    let rows = build_rows(&capture.frames);

    let mut first_ts = None;
    let mut last_ts = None;
    let mut flow_stats: BTreeMap<FlowKey, FlowStats> = BTreeMap::new();
    let mut protocols: HashMap<&str, u64> = HashMap::new();
    for row in &rows {
        update_ts_bounds(&mut first_ts, &mut last_ts, row.timestamp);
        add_flow_stats(&mut flow_stats, row);
        *protocols.entry(row.protocol.as_str()).or_insert(0) += 1;
    }

    let exchanges = build_exchanges(&rows, &capture.frames, &config.correlation);
    let exchange_groups = group_exchanges_by_flow(&exchanges);

    let mut report = make_stub_report(input_path, input_bytes);
    report.capture_summary = Some(CaptureSummary {
        format: capture.format,
        frames_total: rows.len() as u64,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
        protocols: protocol_histogram(protocols),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());

    let duration_s = match (first_ts, last_ts) {
        (Some(start), Some(end)) if end > start => Some(end - start),
        _ => None,
    };

    debug!(
        frames = rows.len(),
        flows = flow_stats.len(),
        exchanges = exchanges.len(),
        "capture analysed"
    );

    report.flows = build_flow_summaries(flow_stats, duration_s);
    report.exchanges = exchanges;
    report.exchange_groups = exchange_groups;
    if config.include_frames {
        report.frames = rows;
    }
    report
}

fn protocol_histogram(counts: HashMap<&str, u64>) -> Vec<ProtocolCount> {
    let mut histogram: Vec<ProtocolCount> = counts
        .into_iter()
        .map(|(protocol, frames)| ProtocolCount {
            protocol: protocol.to_string(),
            frames,
        })
        .collect();
    histogram.sort_by(|a, b| {
        b.frames
            .cmp(&a.frames)
            .then_with(|| a.protocol.cmp(&b.protocol))
    });
    histogram
}

/// Widen `[first, last]` to include `ts`; untimed frames leave it alone.
fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    *first = Some(first.map_or(ts, |current| current.min(ts)));
    *last = Some(last.map_or(ts, |current| current.max(ts)));
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
