//! STUN/TURN message detection (RFC 5389 magic cookie).

use super::common::reader::ByteReader;

const HEADER_LEN: usize = 20;
const MAGIC_COOKIE_OFFSET: usize = 4;
const MAGIC_COOKIE: u32 = 0x2112_a442;

pub(crate) fn is_stun(payload: &[u8]) -> bool {
    let reader = ByteReader::new(payload);
    reader.has(0, HEADER_LEN) && reader.u32_be(MAGIC_COOKIE_OFFSET) == Some(MAGIC_COOKIE)
}
