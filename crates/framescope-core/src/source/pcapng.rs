use pcap_parser::{
    Block, EnhancedPacketBlock, InterfaceDescriptionBlock, Linktype, SimplePacketBlock,
    parse_block_be, parse_block_le, parse_sectionheaderblock,
};
use tracing::{debug, warn};

use super::RawFrame;
use super::error::FormatError;
use super::layout;

#[derive(Debug, Clone, Copy, PartialEq)]
struct InterfaceInfo {
    link_type: Linktype,
    /// Seconds per timestamp tick.
    resolution: f64,
    offset_seconds: i64,
}

impl Default for InterfaceInfo {
    fn default() -> Self {
        Self {
            link_type: Linktype::ETHERNET,
            resolution: layout::DEFAULT_TS_RESOLUTION,
            offset_seconds: 0,
        }
    }
}

impl From<&InterfaceDescriptionBlock<'_>> for InterfaceInfo {
    fn from(idb: &InterfaceDescriptionBlock<'_>) -> Self {
        Self {
            link_type: idb.linktype,
            resolution: seconds_per_tick(idb.if_tsresol),
            offset_seconds: idb.if_tsoffset as i64,
        }
    }
}

enum BlockStep<'a> {
    Frame(RawFrame<'a>),
    Continue,
    Halt,
}

/// Block iterator over a pcapng buffer.
///
/// Byte order is re-established by every Section Header Block, which also
/// clears the interface table. Any inconsistent block ends iteration.
#[derive(Debug, Clone)]
pub(crate) struct PcapNgReader<'a> {
    rest: &'a [u8],
    total_len: usize,
    big_endian: Option<bool>,
    interfaces: Vec<InterfaceInfo>,
    done: bool,
}

impl<'a> PcapNgReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Result<Self, FormatError> {
        if data.len() < layout::PCAPNG_MIN_LEN {
            return Err(FormatError::TooShort {
                needed: layout::PCAPNG_MIN_LEN,
                actual: data.len(),
            });
        }
        Ok(Self {
            rest: data,
            total_len: data.len(),
            big_endian: None,
            interfaces: Vec::new(),
            done: false,
        })
    }

    fn offset(&self) -> usize {
        self.total_len - self.rest.len()
    }

    fn next_block(&mut self) -> BlockStep<'a> {
        let offset = self.offset();
        if self.rest.is_empty() {
            return BlockStep::Halt;
        }
        let parsed = if self.rest.starts_with(&layout::PCAPNG_MAGIC) {
            parse_sectionheaderblock(self.rest).map(|(rest, shb)| (rest, Block::SectionHeader(shb)))
        } else {
            match self.big_endian {
                Some(true) => parse_block_be(self.rest),
                Some(false) => parse_block_le(self.rest),
                None => {
                    warn!(offset, "pcapng block before any section header, stopping");
                    return BlockStep::Halt;
                }
            }
        };
        let Ok((rest, block)) = parsed else {
            debug!(
                offset,
                remaining = self.rest.len(),
                "inconsistent pcapng block, stopping"
            );
            return BlockStep::Halt;
        };
        self.rest = rest;

        match block {
            Block::SectionHeader(shb) => {
                self.big_endian = Some(shb.big_endian());
                self.interfaces.clear();
                BlockStep::Continue
            }
            Block::InterfaceDescription(idb) => {
                self.interfaces.push(InterfaceInfo::from(&idb));
                BlockStep::Continue
            }
            Block::EnhancedPacket(epb) => match self.enhanced_packet(&epb) {
                Some(frame) => BlockStep::Frame(frame),
                None => {
                    debug!(offset, "enhanced packet overruns its block, stopping");
                    BlockStep::Halt
                }
            },
            Block::SimplePacket(spb) => BlockStep::Frame(self.simple_packet(&spb)),
            _ => {
                debug!(offset, "skipping pcapng block");
                BlockStep::Continue
            }
        }
    }

    fn enhanced_packet(&self, epb: &EnhancedPacketBlock<'a>) -> Option<RawFrame<'a>> {
        let data = epb.data.get(..epb.caplen as usize)?;
        let info = self
            .interfaces
            .get(epb.if_id as usize)
            .copied()
            .unwrap_or_default();
        let ticks = (u64::from(epb.ts_high) << 32) | u64::from(epb.ts_low);
        let timestamp = ticks as f64 * info.resolution + info.offset_seconds as f64;

        Some(RawFrame {
            timestamp: Some(timestamp),
            captured_length: epb.caplen,
            original_length: epb.origlen,
            interface_index: Some(epb.if_id),
            link_type: info.link_type,
            data,
        })
    }

    /// Captured length is what the block holds, capped at the original length.
    fn simple_packet(&self, spb: &SimplePacketBlock<'a>) -> RawFrame<'a> {
        let captured = spb.data.len().min(spb.origlen as usize);
        let link_type = self
            .interfaces
            .first()
            .map(|info| info.link_type)
            .unwrap_or(Linktype::ETHERNET);

        RawFrame {
            timestamp: None,
            captured_length: captured as u32,
            original_length: spb.origlen,
            interface_index: None,
            link_type,
            data: &spb.data[..captured],
        }
    }
}

impl<'a> Iterator for PcapNgReader<'a> {
    type Item = RawFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.next_block() {
                BlockStep::Frame(frame) => return Some(frame),
                BlockStep::Continue => {}
                BlockStep::Halt => self.done = true,
            }
        }
        None
    }
}

/// `if_tsresol` as seconds per tick: high bit selects a power of two,
/// otherwise a power of ten.
fn seconds_per_tick(tsresol: u8) -> f64 {
    let exponent = i32::from(tsresol & 0x7f);
    if tsresol & 0x80 != 0 {
        2f64.powi(-exponent)
    } else {
        10f64.powi(-exponent)
    }
}
