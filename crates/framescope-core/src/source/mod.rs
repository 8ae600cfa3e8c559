//! Capture container readers.
//!
//! Both the legacy pcap format and pcapng are sniffed from the first four
//! bytes, never from the file extension. Readers yield [`RawFrame`]s that
//! borrow the capture buffer and stop quietly at the first truncated or
//! inconsistent record. Only an unknown magic or a buffer shorter than the
//! minimal header is an error.

mod error;
mod layout;
mod legacy;
mod pcapng;

use std::fs;
use std::path::{Path, PathBuf};

pub use error::{FormatError, SourceError};
pub use pcap_parser::Linktype;

use serde::Serialize;

use legacy::LegacyReader;
use pcapng::PcapNgReader;

/// Which container layout a capture uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureFormat {
    Pcap,
    Pcapng,
}

/// One captured frame as stored in the container.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame<'a> {
    /// Seconds since the epoch; absent for pcapng Simple Packet Blocks.
    pub timestamp: Option<f64>,
    pub captured_length: u32,
    pub original_length: u32,
    pub interface_index: Option<u32>,
    pub link_type: Linktype,
    pub data: &'a [u8],
}

/// All frames of a capture, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture<'a> {
    pub format: CaptureFormat,
    pub frames: Vec<RawFrame<'a>>,
}

/// Lazy frame iterator over either container format.
///
/// Callers may stop between frames; nothing past the last yielded frame is
/// read.
#[derive(Debug, Clone)]
pub struct CaptureReader<'a> {
    inner: ReaderKind<'a>,
}

#[derive(Debug, Clone)]
enum ReaderKind<'a> {
    Legacy(LegacyReader<'a>),
    Ng(PcapNgReader<'a>),
}

impl<'a> CaptureReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, FormatError> {
        let inner = match sniff_format(data)? {
            CaptureFormat::Pcap => ReaderKind::Legacy(LegacyReader::new(data)?),
            CaptureFormat::Pcapng => ReaderKind::Ng(PcapNgReader::new(data)?),
        };
        Ok(Self { inner })
    }

    pub fn format(&self) -> CaptureFormat {
        match self.inner {
            ReaderKind::Legacy(_) => CaptureFormat::Pcap,
            ReaderKind::Ng(_) => CaptureFormat::Pcapng,
        }
    }
}

impl<'a> Iterator for CaptureReader<'a> {
    type Item = RawFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ReaderKind::Legacy(reader) => reader.next(),
            ReaderKind::Ng(reader) => reader.next(),
        }
    }
}

/// Identify the container from its magic bytes.
pub fn sniff_format(data: &[u8]) -> Result<CaptureFormat, FormatError> {
    let magic: [u8; layout::MAGIC_LEN] = data
        .get(..layout::MAGIC_LEN)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(FormatError::TooShort {
            needed: layout::MAGIC_LEN,
            actual: data.len(),
        })?;
    match magic {
        layout::LEGACY_MAGIC_USEC_BE
        | layout::LEGACY_MAGIC_USEC_LE
        | layout::LEGACY_MAGIC_NSEC_BE
        | layout::LEGACY_MAGIC_NSEC_LE => Ok(CaptureFormat::Pcap),
        layout::PCAPNG_MAGIC => Ok(CaptureFormat::Pcapng),
        _ => Err(FormatError::UnrecognizedMagic { magic }),
    }
}

/// Parse a whole capture buffer into its frames.
///
/// # Examples
/// ```
/// use framescope_core::{CaptureFormat, FormatError, parse_capture};
///
/// let mut header = vec![0xd4, 0xc3, 0xb2, 0xa1];
/// header.extend_from_slice(&[0u8; 16]);
/// header.extend_from_slice(&1u32.to_le_bytes());
///
/// let capture = parse_capture(&header)?;
/// assert_eq!(capture.format, CaptureFormat::Pcap);
/// assert!(capture.frames.is_empty());
///
/// assert!(matches!(
///     parse_capture(b"GIF89a"),
///     Err(FormatError::UnrecognizedMagic { .. })
/// ));
/// # Ok::<(), FormatError>(())
/// ```
pub fn parse_capture(data: &[u8]) -> Result<Capture<'_>, FormatError> {
    let reader = CaptureReader::new(data)?;
    let format = reader.format();
    Ok(Capture {
        format,
        frames: reader.collect(),
    })
}

/// A capture file read fully into memory.
#[derive(Debug, Clone)]
pub struct CaptureFile {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl CaptureFile {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let bytes = fs::read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn capture(&self) -> Result<Capture<'_>, SourceError> {
        Ok(parse_capture(&self.bytes)?)
    }
}
