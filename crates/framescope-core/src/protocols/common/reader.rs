use std::ops::Range;

/// Bounds-checked view over a byte buffer.
///
/// Every accessor returns `None` instead of reading past the end, so decoders
/// never index raw slices directly.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// True when `len` bytes starting at `offset` are available.
    pub(crate) fn has(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .is_some_and(|end| end <= self.data.len())
    }

    pub(crate) fn u8(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    pub(crate) fn u16_be(&self, offset: usize) -> Option<u16> {
        self.array::<2>(offset).map(u16::from_be_bytes)
    }

    pub(crate) fn u32_be(&self, offset: usize) -> Option<u32> {
        self.array::<4>(offset).map(u32::from_be_bytes)
    }

    pub(crate) fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let end = offset.checked_add(N)?;
        self.data.get(offset..end)?.try_into().ok()
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> Option<&'a [u8]> {
        self.data.get(range)
    }

    /// `len` bytes from `offset`, or `None` when the buffer is shorter.
    pub(crate) fn slice_len(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        let end = offset.checked_add(len)?;
        self.slice(offset..end)
    }

    /// Everything from `offset` to the end; empty when `offset` is past it.
    pub(crate) fn tail(&self, offset: usize) -> &'a [u8] {
        self.data.get(offset..).unwrap_or(&[])
    }
}
