use crate::protocols::common::names::dns_type_name;
use crate::protocols::common::reader::ByteReader;
use crate::protocols::frame::DnsMeta;

use super::layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DnsDecode {
    pub summary: String,
    pub meta: DnsMeta,
}

/// Decode the header and first question of a DNS message.
pub(crate) fn decode_dns(message: &[u8]) -> Option<DnsDecode> {
    let reader = ByteReader::new(message);
    if !reader.has(0, layout::HEADER_LEN) {
        return None;
    }
    let id = reader.u16_be(layout::ID_OFFSET)?;
    let flags = reader.u16_be(layout::FLAGS_OFFSET)?;
    let qdcount = reader.u16_be(layout::QDCOUNT_OFFSET)?;
    let qr = flags & layout::FLAG_QR != 0;

    let mut name = String::new();
    let mut qtype = None;
    if qdcount > 0 {
        let (decoded, next) = read_name(&reader, layout::QUESTION_OFFSET);
        name = decoded;
        if reader.has(next, 4) {
            qtype = reader.u16_be(next);
        }
    }
    let qtype_name = dns_type_name(qtype);

    let summary = match (qr, name.is_empty(), &qtype_name) {
        (true, true, _) => "response".to_string(),
        (true, false, _) => format!("response for {}", name),
        (false, true, _) => "query".to_string(),
        (false, false, Some(type_name)) => format!("query {} {}", name, type_name),
        (false, false, None) => format!("query {}", name),
    };

    Some(DnsDecode {
        summary,
        meta: DnsMeta {
            id,
            qr,
            name: (!name.is_empty()).then_some(name),
            qtype,
            qtype_name,
        },
    })
}

/// Read a possibly compressed name, returning it and the offset just past
/// its encoding at `pos`.
fn read_name(reader: &ByteReader<'_>, pos: usize) -> (String, usize) {
    let mut labels: Vec<String> = Vec::new();
    let mut p = pos;
    let mut next = pos;
    let mut jumped = false;

    for _ in 0..layout::MAX_NAME_STEPS {
        let Some(len) = reader.u8(p) else {
            break;
        };
        if len == 0 {
            if !jumped {
                next = p + 1;
            }
            break;
        }
        if len & layout::POINTER_MASK == layout::POINTER_MASK {
            let Some(low) = reader.u8(p + 1) else {
                break;
            };
            if !jumped {
                next = p + 2;
            }
            p = (usize::from(len & layout::POINTER_OFFSET_MASK) << 8) | usize::from(low);
            jumped = true;
            continue;
        }
        p += 1;
        let end = (p + usize::from(len)).min(reader.len());
        let label = reader.slice(p.min(end)..end).unwrap_or_default();
        labels.push(String::from_utf8_lossy(label).into_owned());
        p += usize::from(len);
    }

    (labels.join("."), next)
}
