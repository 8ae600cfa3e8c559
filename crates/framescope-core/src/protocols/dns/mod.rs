//! DNS header and first-question decoding.
//!
//! Only the question section is read: transaction id, QR bit, the first name
//! (following compression pointers relative to the message start) and its
//! query type.

pub mod layout;
pub mod parser;

pub(crate) use parser::{DnsDecode, decode_dns};
