//! Framescope core library for offline capture dissection.
//!
//! The pipeline has three stages. The container reader turns a pcap or
//! pcapng buffer into raw frames. The frame decoder classifies every frame
//! layer by layer and sniffs application protocols. The exchange correlator
//! pairs requests with responses across the decoded stream. Parsing is
//! byte-oriented and side-effect free; file I/O is isolated in `source`.
//!
//! Invariants:
//! - Decoding and correlation never fail; malformed input degrades to the
//!   coarsest tag that still applies.
//! - Flow keys are direction independent.
//! - Report outputs are deterministic and stable across runs.
//!
//! Version française (résumé):
//! Cette crate fournit le cœur d'analyse hors ligne : lecture du conteneur
//! (pcap, pcapng) -> décodage des trames par couche -> corrélation des
//! échanges requête/réponse -> rapport déterministe. Les E/S restent dans
//! `source`; le décodage et la corrélation ne renvoient jamais d'erreur.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use framescope_core::{AnalysisConfig, analyze_capture_file};
//!
//! let report = analyze_capture_file(Path::new("capture.pcapng"), &AnalysisConfig::default())?;
//! println!("exchanges: {}", report.exchanges.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;

mod analysis;
mod protocols;
mod source;

pub use analysis::{
    AnalysisConfig, AnalysisError, CorrelationConfig, DEFAULT_HTTP_SNIFF_LEN,
    DEFAULT_TCP_BURST_CAP, Exchange, ExchangeGroup, ExchangeProtocol, ExchangeSide, ExchangeStatus,
    FlowEndpoints, FlowKey, FlowProtocol, FrameRow, SideSummary, Transaction, TransactionKey,
    TransactionRole, analyze_capture, analyze_capture_file, build_exchanges, build_rows,
    group_exchanges_by_flow,
};
pub use protocols::{
    ArpMeta, ClientHello, DecodedFrame, DhcpMeta, DnsMeta, EchoMeta, EthernetLayer, FrameMeta,
    IcmpMeta, NetworkLayer, PayloadRange, PayloadTransport, StartLine, TcpFlags, TcpMeta,
    TransportLayer, decode, decode_ethernet, extract_frame_payload, extract_payload,
    sniff_client_hello, sniff_start_line,
};
pub use source::{
    Capture, CaptureFile, CaptureFormat, CaptureReader, FormatError, Linktype, RawFrame,
    SourceError, parse_capture, sniff_format,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Analysis report. Every list has a fixed order, so two runs over the
/// same capture serialize byte for byte identically.
///
/// # Examples
/// ```
/// use framescope_core::make_stub_report;
///
/// let report = make_stub_report("lab/arp.pcap", 96);
/// assert_eq!(report.report_version, framescope_core::REPORT_VERSION);
/// assert_eq!(report.input.bytes, 96);
/// assert!(report.exchanges.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Bumped on incompatible schema changes only.
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the last frame, so reruns produce identical output.
    pub generated_at: String,
    pub input: InputInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Per-frame rows, only when requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<FrameRow>,
    /// Flow summaries sorted by flow key.
    pub flows: Vec<FlowSummary>,
    /// Exchanges sorted by request start time.
    pub exchanges: Vec<Exchange>,
    pub exchange_groups: Vec<ExchangeGroup>,
}

/// Producer of the report.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Path exactly as given on the command line.
    pub path: String,
    /// File size on disk.
    pub bytes: u64,
}

/// Container format, frame count, time bounds and the protocol histogram.
///
/// Time bounds are omitted when no frame carries a timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSummary {
    pub format: CaptureFormat,
    pub frames_total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    /// Frames per protocol tag, most frequent first.
    pub protocols: Vec<ProtocolCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolCount {
    pub protocol: String,
    pub frames: u64,
}

/// Traffic totals for one flow key.
///
/// # Examples
/// ```
/// use framescope_core::{FlowKey, FlowProtocol, FlowSummary};
///
/// let key = FlowKey::new(FlowProtocol::Udp, "10.0.0.1", 5000, "10.0.0.2", 5001);
/// let flow = FlowSummary {
///     protocol: "UDP".to_string(),
///     endpoint_a: key.endpoint_a.clone(),
///     endpoint_b: key.endpoint_b.clone(),
///     flow_key: key,
///     packets: 2,
///     bytes: 120,
///     pps: None,
///     bps: None,
/// };
/// assert_eq!(flow.endpoint_a, "10.0.0.1:5000");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct FlowSummary {
    pub flow_key: FlowKey,
    /// `TCP`, `UDP` or `DNS`.
    pub protocol: String,
    pub endpoint_a: String,
    pub endpoint_b: String,
    pub packets: u64,
    /// Captured bytes, link layer included.
    pub bytes: u64,
    /// Packets per second over the capture duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pps: Option<f64>,
    /// Bytes per second over the capture duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bps: Option<f64>,
}

/// Report header for `input_path` with every aggregate left empty.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "framescope".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_owned(),
        input: InputInfo {
            path: input_path.to_owned(),
            bytes: input_bytes,
        },
        capture_summary: None,
        frames: Vec::new(),
        flows: Vec::new(),
        exchanges: Vec::new(),
        exchange_groups: Vec::new(),
    }
}
