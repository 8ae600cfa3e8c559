use serde::Serialize;

/// Bytes counted per frame when coalescing TCP bursts.
pub const DEFAULT_TCP_BURST_CAP: usize = 16 * 1024;
/// Payload bytes inspected for an HTTP start line while pairing.
pub const DEFAULT_HTTP_SNIFF_LEN: usize = 512;

/// Tunables of the exchange correlator.
///
/// # Examples
/// ```
/// use framescope_core::CorrelationConfig;
///
/// let config = CorrelationConfig::default();
/// assert_eq!(config.tcp_burst_cap, 16 * 1024);
/// assert_eq!(config.http_sniff_len, 512);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorrelationConfig {
    pub tcp_burst_cap: usize,
    pub http_sniff_len: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            tcp_burst_cap: DEFAULT_TCP_BURST_CAP,
            http_sniff_len: DEFAULT_HTTP_SNIFF_LEN,
        }
    }
}

/// Report assembly options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisConfig {
    /// Include one row per frame in the report.
    pub include_frames: bool,
    pub correlation: CorrelationConfig,
}
