pub const HEADER_LEN: usize = 12;
pub const ID_OFFSET: usize = 0;
pub const FLAGS_OFFSET: usize = 2;
pub const QDCOUNT_OFFSET: usize = 4;
pub const QUESTION_OFFSET: usize = 12;

pub const FLAG_QR: u16 = 0x8000;
pub const POINTER_MASK: u8 = 0xc0;
pub const POINTER_OFFSET_MASK: u8 = 0x3f;
/// Upper bound on labels and pointer hops while reading one name.
pub const MAX_NAME_STEPS: usize = 128;

pub const PORT: u16 = 53;
