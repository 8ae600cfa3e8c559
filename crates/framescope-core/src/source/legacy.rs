use pcap_parser::{Linktype, parse_pcap_frame, parse_pcap_frame_be, parse_pcap_header};
use tracing::debug;

use super::RawFrame;
use super::error::FormatError;
use super::layout;

/// Record iterator over a legacy pcap buffer.
///
/// Each `next` parses one record header and its captured bytes off the
/// remaining slice. A record that does not fit ends iteration.
#[derive(Debug, Clone)]
pub(crate) struct LegacyReader<'a> {
    rest: &'a [u8],
    big_endian: bool,
    nanosecond: bool,
    link_type: Linktype,
}

impl<'a> LegacyReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Result<Self, FormatError> {
        let magic: [u8; layout::MAGIC_LEN] = data
            .get(..layout::MAGIC_LEN)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(FormatError::TooShort {
                needed: layout::MAGIC_LEN,
                actual: data.len(),
            })?;
        let nanosecond = match magic {
            layout::LEGACY_MAGIC_USEC_BE | layout::LEGACY_MAGIC_USEC_LE => false,
            layout::LEGACY_MAGIC_NSEC_BE | layout::LEGACY_MAGIC_NSEC_LE => true,
            _ => return Err(FormatError::UnrecognizedMagic { magic }),
        };
        if data.len() < layout::LEGACY_GLOBAL_HEADER_LEN {
            return Err(FormatError::TooShort {
                needed: layout::LEGACY_GLOBAL_HEADER_LEN,
                actual: data.len(),
            });
        }
        let (rest, header) =
            parse_pcap_header(data).map_err(|_| FormatError::UnrecognizedMagic { magic })?;

        Ok(Self {
            rest,
            big_endian: header.is_bigendian(),
            nanosecond,
            link_type: header.network,
        })
    }
}

impl<'a> Iterator for LegacyReader<'a> {
    type Item = RawFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let parsed = if self.big_endian {
            parse_pcap_frame_be(self.rest)
        } else {
            parse_pcap_frame(self.rest)
        };
        let Ok((rest, record)) = parsed else {
            debug!(
                remaining = self.rest.len(),
                "truncated pcap record, stopping"
            );
            self.rest = &[];
            return None;
        };
        self.rest = rest;

        let divisor = if self.nanosecond {
            layout::NSEC_PER_SEC
        } else {
            layout::USEC_PER_SEC
        };
        Some(RawFrame {
            timestamp: Some(f64::from(record.ts_sec) + f64::from(record.ts_usec) / divisor),
            captured_length: record.caplen,
            original_length: record.origlen,
            interface_index: None,
            link_type: self.link_type,
            data: record.data,
        })
    }
}
