//! Container magic numbers and minimal sizes (legacy pcap and pcapng).

pub const MAGIC_LEN: usize = 4;

pub const LEGACY_MAGIC_USEC_BE: [u8; 4] = [0xa1, 0xb2, 0xc3, 0xd4];
pub const LEGACY_MAGIC_USEC_LE: [u8; 4] = [0xd4, 0xc3, 0xb2, 0xa1];
pub const LEGACY_MAGIC_NSEC_BE: [u8; 4] = [0xa1, 0xb2, 0x3c, 0x4d];
pub const LEGACY_MAGIC_NSEC_LE: [u8; 4] = [0x4d, 0x3c, 0xb2, 0xa1];

pub const LEGACY_GLOBAL_HEADER_LEN: usize = 24;

pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
/// Block type, block total length and byte-order magic.
pub const PCAPNG_MIN_LEN: usize = 12;

pub const DEFAULT_TS_RESOLUTION: f64 = 1e-6;
pub const USEC_PER_SEC: f64 = 1e6;
pub const NSEC_PER_SEC: f64 = 1e9;
