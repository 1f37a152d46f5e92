//! Anchor containers of the mark attachment subtables.

use ttf_parser::{FromData, LazyArray16, LazyArray32};

use crate::parser::{Offset16, Stream};
use crate::{AnchorTable, Error};

/// An anchor matrix: a row per glyph and a column per mark class.
///
/// Used by the BaseArray, Mark2Array and LigatureAttach tables.
#[derive(Clone, Copy, Debug)]
pub struct AnchorMatrix<'a> {
    data: &'a [u8],
    /// Number of rows.
    pub rows: u16,
    /// Number of columns, i.e. mark classes.
    pub cols: u16,
    matrix: LazyArray32<'a, Offset16>,
}

impl<'a> AnchorMatrix<'a> {
    /// Parses an anchor matrix with `cols` columns.
    pub fn parse(data: &'a [u8], cols: u16) -> Result<Self, Error> {
        let mut s = Stream::new(data);
        let rows = s.read::<u16>().ok_or(Error::MalformedFont)?;
        let count = u32::from(rows) * u32::from(cols);
        let matrix = s.read_array32(count).ok_or(Error::MalformedFont)?;
        Ok(AnchorMatrix {
            data,
            rows,
            cols,
            matrix,
        })
    }

    /// Returns an anchor at the specified cell.
    ///
    /// Returns `Ok(None)` for an out of range cell or a NULL offset.
    pub fn get(&self, row: u16, col: u16) -> Result<Option<AnchorTable<'a>>, Error> {
        if col >= self.cols {
            return Ok(None);
        }

        let idx = u32::from(row) * u32::from(self.cols) + u32::from(col);
        parse_anchor_at(self.data, self.matrix.get(idx).and_then(Offset16::non_null))
    }
}

/// A mark array.
#[derive(Clone, Copy, Debug)]
pub struct MarkArray<'a> {
    data: &'a [u8],
    records: LazyArray16<'a, MarkRecord>,
}

impl<'a> MarkArray<'a> {
    /// Parses a mark array.
    pub fn parse(data: &'a [u8]) -> Result<Self, Error> {
        let mut s = Stream::new(data);
        let count = s.read::<u16>().ok_or(Error::MalformedFont)?;
        let records = s.read_array16(count).ok_or(Error::MalformedFont)?;
        Ok(MarkArray { data, records })
    }

    /// Returns the number of marks.
    #[inline]
    pub fn len(&self) -> u16 {
        self.records.len()
    }

    /// Checks that the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a mark class and anchor by coverage index.
    pub fn get(&self, index: u16) -> Result<Option<(u16, AnchorTable<'a>)>, Error> {
        let record = match self.records.get(index) {
            Some(record) => record,
            None => return Ok(None),
        };

        let anchor = parse_anchor_at(self.data, record.anchor)?;
        Ok(anchor.map(|anchor| (record.class, anchor)))
    }
}

#[derive(Clone, Copy, Debug)]
struct MarkRecord {
    class: u16,
    anchor: Option<Offset16>,
}

impl FromData for MarkRecord {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(MarkRecord {
            class: s.read::<u16>()?,
            anchor: s.read::<Offset16>()?.non_null(),
        })
    }
}

fn parse_anchor_at<'a>(
    data: &'a [u8],
    offset: Option<Offset16>,
) -> Result<Option<AnchorTable<'a>>, Error> {
    match offset {
        Some(offset) => {
            let data = data.get(offset.to_usize()..).ok_or(Error::MalformedFont)?;
            AnchorTable::parse(data).map(Some)
        }
        None => Ok(None),
    }
}
