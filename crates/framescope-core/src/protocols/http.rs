//! HTTP/1.x start-line sniffing.
//!
//! Only the first line of a payload is inspected, decoded as Latin-1. The
//! same sniffer classifies frames and pairs HTTP exchanges.

const METHODS: [&str; 8] = [
    "GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "TRACE", "PATCH",
];
const HTTP1_PREFIX: &str = "HTTP/1.";
const HTTP2_PREFACE: &str = "PRI * HTTP/2.0";
const MIN_START_LINE_LEN: usize = 5;

/// Bytes the frame decoder looks at.
pub(crate) const DECODE_SNIFF_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLine {
    Request {
        method: String,
        path: String,
        line: String,
    },
    Response {
        status: u16,
        reason: String,
        line: String,
    },
    /// Cleartext HTTP/2 connection preface.
    Http2Preface,
}

impl StartLine {
    pub(crate) fn summary(&self) -> String {
        match self {
            StartLine::Request { method, path, .. } => format!("HTTP {} {}", method, path),
            StartLine::Response { status, reason, .. } => {
                format!("HTTP {} {}", status, reason).trim_end().to_string()
            }
            StartLine::Http2Preface => "HTTP/2 (preface)".to_string(),
        }
    }

    /// `DOH` for requests that look like DNS over HTTPS, else `HTTP`.
    pub(crate) fn app_tag(&self) -> &'static str {
        match self {
            StartLine::Request { path, .. }
                if path.contains("/dns-query") || path.to_lowercase().contains("doh") =>
            {
                "DOH"
            }
            _ => "HTTP",
        }
    }
}

/// Classify the first line of `payload`. The caller bounds how many bytes are
/// considered.
pub fn sniff_start_line(payload: &[u8]) -> Option<StartLine> {
    if payload.len() < MIN_START_LINE_LEN {
        return None;
    }
    let text: String = payload.iter().map(|&b| char::from(b)).collect();
    let line = text.split('\n').next().unwrap_or_default().trim();
    if line.is_empty() {
        return None;
    }

    for method in METHODS {
        let is_method = line
            .strip_prefix(method)
            .is_some_and(|rest| rest.starts_with(' '));
        if !is_method {
            continue;
        }
        let parts: Vec<&str> = line.split(' ').collect();
        let version = parts.get(2).copied().unwrap_or_default();
        if version.starts_with(HTTP1_PREFIX) {
            let path = match parts.get(1) {
                Some(path) if !path.is_empty() => path.to_string(),
                _ => "/".to_string(),
            };
            return Some(StartLine::Request {
                method: parts[0].to_string(),
                path,
                line: line.to_string(),
            });
        }
    }

    if line.starts_with(HTTP1_PREFIX) {
        let parts: Vec<&str> = line.split(' ').collect();
        if let Some(status) = parts.get(1).and_then(|code| leading_number(code)) {
            return Some(StartLine::Response {
                status,
                reason: parts[2..].join(" "),
                line: line.to_string(),
            });
        }
    }

    if line.starts_with(HTTP2_PREFACE) {
        return Some(StartLine::Http2Preface);
    }
    None
}

fn leading_number(text: &str) -> Option<u16> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}
