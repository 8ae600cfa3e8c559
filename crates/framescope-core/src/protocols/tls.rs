//! TLS ClientHello detection with Server Name Indication extraction.

use super::common::reader::ByteReader;

const RECORD_HEADER_LEN: usize = 5;
const CONTENT_TYPE_HANDSHAKE: u8 = 0x16;
const VERSION_MAJOR: u8 = 0x03;
const HANDSHAKE_HEADER_LEN: usize = 4;
const HANDSHAKE_CLIENT_HELLO: u8 = 0x01;
/// client_version + random.
const HELLO_FIXED_LEN: usize = 2 + 32;
const EXTENSION_SERVER_NAME: u16 = 0x0000;
const SERVER_NAME_HOST: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub sni: Option<String>,
}

impl ClientHello {
    pub(crate) fn summary(&self) -> String {
        match &self.sni {
            Some(sni) => format!("TLS ClientHello SNI={}", sni),
            None => "TLS ClientHello".to_string(),
        }
    }
}

/// Recognize a complete TLS handshake record carrying a ClientHello.
///
/// A hello whose body is cut short still matches, without an SNI.
pub fn sniff_client_hello(payload: &[u8]) -> Option<ClientHello> {
    let reader = ByteReader::new(payload);
    if reader.u8(0)? != CONTENT_TYPE_HANDSHAKE || reader.u8(1)? != VERSION_MAJOR {
        return None;
    }
    let record_len = usize::from(reader.u16_be(3)?);
    if !reader.has(0, RECORD_HEADER_LEN + record_len) {
        return None;
    }
    if reader.u8(RECORD_HEADER_LEN)? != HANDSHAKE_CLIENT_HELLO {
        return None;
    }
    // The record length alone may not cover the handshake header.
    if !reader.has(0, RECORD_HEADER_LEN + HANDSHAKE_HEADER_LEN) {
        return None;
    }

    Some(ClientHello {
        sni: find_server_name(&reader, RECORD_HEADER_LEN + HANDSHAKE_HEADER_LEN),
    })
}

fn find_server_name(reader: &ByteReader<'_>, hello: usize) -> Option<String> {
    let mut p = hello;
    if !reader.has(p, 2) {
        return None;
    }
    p += HELLO_FIXED_LEN;
    let session_id_len = usize::from(reader.u8(p)?);
    p += 1 + session_id_len;
    let cipher_suites_len = usize::from(reader.u16_be(p)?);
    p += 2 + cipher_suites_len;
    let compression_len = usize::from(reader.u8(p)?);
    p += 1 + compression_len;
    let extensions_len = usize::from(reader.u16_be(p)?);
    p += 2;

    let end = reader.len().min(p + extensions_len);
    while p + 4 <= end {
        let ext_type = reader.u16_be(p)?;
        let ext_len = usize::from(reader.u16_be(p + 2)?);
        p += 4;
        if p + ext_len > end {
            break;
        }
        if ext_type == EXTENSION_SERVER_NAME && ext_len >= 5 {
            if let Some(name) = first_host_name(reader, p + 2, (p + ext_len).min(end)) {
                return Some(name);
            }
        }
        p += ext_len;
    }
    None
}

fn first_host_name(reader: &ByteReader<'_>, start: usize, list_end: usize) -> Option<String> {
    let mut q = start;
    while q + 3 <= list_end {
        let name_type = reader.u8(q)?;
        let name_len = usize::from(reader.u16_be(q + 1)?);
        q += 3;
        if name_type == SERVER_NAME_HOST && q + name_len <= list_end {
            let bytes = reader.slice_len(q, name_len)?;
            return Some(String::from_utf8_lossy(bytes).into_owned());
        }
        q += name_len;
    }
    None
}
