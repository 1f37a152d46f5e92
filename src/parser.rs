//! Bounds-checked, big-endian reads over font data.

use ttf_parser::{FromData, LazyArray16, LazyArray32};

use crate::Error;

/// A 16-bit offset to a subtable, relative to the start of its parent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Offset16(pub u16);

impl Offset16 {
    /// Returns the offset, or `None` for a NULL offset.
    #[inline]
    pub fn non_null(self) -> Option<Self> {
        if self.0 != 0 {
            Some(self)
        } else {
            None
        }
    }

    /// Returns the offset as `usize`.
    #[inline]
    pub fn to_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl FromData for Offset16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(Offset16)
    }
}

/// A streaming binary parser.
#[derive(Clone, Copy, Default, Debug)]
pub struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    /// Creates a new `Stream` parser.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Stream { data, offset: 0 }
    }

    /// Returns the current offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the trailing data.
    ///
    /// Returns `None` when the offset is past the end.
    #[inline]
    pub fn tail(&self) -> Option<&'a [u8]> {
        self.data.get(self.offset..)
    }

    /// Advances by the specified number of bytes.
    #[inline]
    pub fn advance(&mut self, len: usize) {
        self.offset = self.offset.saturating_add(len);
    }

    /// Parses the type from the stream.
    ///
    /// Returns `None` when there is not enough data left in the stream
    /// or the type parsing failed.
    #[inline]
    pub fn read<T: FromData>(&mut self) -> Option<T> {
        let v = Self::read_at(self.data, self.offset)?;
        self.offset += T::SIZE;
        Some(v)
    }

    /// Parses the type from the stream at offset.
    #[inline]
    pub fn read_at<T: FromData>(data: &[u8], offset: usize) -> Option<T> {
        let end = offset.checked_add(T::SIZE)?;
        data.get(offset..end).and_then(T::parse)
    }

    /// Reads the next `len` bytes.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let v = self.data.get(self.offset..end)?;
        self.offset = end;
        Some(v)
    }

    /// Reads the next `count` types as a slice.
    #[inline]
    pub fn read_array16<T: FromData>(&mut self, count: u16) -> Option<LazyArray16<'a, T>> {
        let len = usize::from(count).checked_mul(T::SIZE)?;
        self.read_bytes(len).map(LazyArray16::new)
    }

    /// Reads the next `count` types as a slice.
    #[inline]
    pub fn read_array32<T: FromData>(&mut self, count: u32) -> Option<LazyArray32<'a, T>> {
        let len = usize::try_from(count).ok()?.checked_mul(T::SIZE)?;
        self.read_bytes(len).map(LazyArray32::new)
    }
}

/// A zero-copy view over a table inside a font blob.
///
/// All reads are big-endian and bounds-checked. A read that would go past
/// the end of the underlying data fails with [`Error::MalformedFont`].
#[derive(Clone, Copy, Debug)]
pub struct TableView<'a> {
    data: &'a [u8],
}

impl<'a> TableView<'a> {
    /// Creates a new view. The data is referenced, not copied.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        TableView { data }
    }

    /// Returns the viewed bytes.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the number of viewed bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks that the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reads a value at a byte offset from the start of the view.
    #[inline]
    pub fn read_at<T: FromData>(&self, offset: usize) -> Result<T, Error> {
        Stream::read_at::<T>(self.data, offset).ok_or(Error::MalformedFont)
    }

    /// Reads a `uint16` at a byte offset.
    #[inline]
    pub fn read_u16(&self, offset: usize) -> Result<u16, Error> {
        self.read_at::<u16>(offset)
    }

    /// Reads an `int16` at a byte offset.
    #[inline]
    pub fn read_i16(&self, offset: usize) -> Result<i16, Error> {
        self.read_at::<i16>(offset)
    }

    /// Reads an `Offset16` at a byte offset.
    ///
    /// A NULL offset is returned as `None`.
    #[inline]
    pub fn read_offset16(&self, offset: usize) -> Result<Option<Offset16>, Error> {
        self.read_at::<Offset16>(offset).map(Offset16::non_null)
    }

    /// Returns a view starting at `offset` bytes from the start of this one.
    ///
    /// The new view spans up to the end of the data, since sub-tables are
    /// variable-length and their size is only known after parsing.
    #[inline]
    pub fn sub_view(&self, offset: usize) -> Result<TableView<'a>, Error> {
        self.data
            .get(offset..)
            .map(TableView::new)
            .ok_or(Error::MalformedFont)
    }
}
