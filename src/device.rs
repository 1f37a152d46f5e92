//! Device tables.
//!
//! https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#device-and-variationindex-tables

use ttf_parser::{FromData, LazyArray16};

use crate::parser::TableView;
use crate::Error;

const VARIATION_INDEX_FORMAT: u16 = 0x8000;

/// A device table.
#[derive(Clone, Copy, Debug)]
pub enum Device<'a> {
    /// Per-size pixel adjustments.
    Hinting(HintingDevice<'a>),
    /// A reference into the GDEF item variation store.
    Variation(VariationDevice),
}

impl<'a> Device<'a> {
    /// Parses a device table.
    ///
    /// Returns `Ok(None)` for formats other than 1, 2, 3 and `0x8000`.
    /// Such tables never adjust anything. Only a truncated header is an error.
    pub fn parse(data: &'a [u8]) -> Result<Option<Self>, Error> {
        let view = TableView::new(data);
        let first = view.read_u16(0)?;
        let second = view.read_u16(2)?;
        let format = view.read_u16(4)?;
        match format {
            1..=3 => {
                let start_size = first;
                let end_size = second;
                let count = if end_size >= start_size {
                    usize::from((end_size - start_size) >> (4 - format)) + 1
                } else {
                    0
                };

                // Words missing at the end of the data adjust by 0.
                let start = 6;
                let available = (data.len() - start) / u16::SIZE;
                let end = start + count.min(available) * u16::SIZE;
                Ok(Some(Device::Hinting(HintingDevice {
                    start_size,
                    end_size,
                    delta_format: format,
                    delta_values: LazyArray16::new(data.get(start..end).unwrap_or_default()),
                })))
            }
            VARIATION_INDEX_FORMAT => Ok(Some(Device::Variation(VariationDevice {
                outer_index: first,
                inner_index: second,
            }))),
            _ => {
                log::debug!("ignoring device table with delta format {}", format);
                Ok(None)
            }
        }
    }

    /// Returns a pixel adjustment for the specified rendering size.
    ///
    /// Variation devices carry design-unit deltas that are applied together
    /// with the rest of the variation data, so they never adjust pixels.
    pub fn adjustment(&self, ppem: u16) -> i16 {
        match self {
            Device::Hinting(hinting) => hinting.adjustment(ppem),
            Device::Variation(variation) => {
                log::trace!(
                    "ignoring variation device {}:{}",
                    variation.outer_index,
                    variation.inner_index
                );
                0
            }
        }
    }
}

/// A hinting device table.
#[derive(Clone, Copy, Debug)]
pub struct HintingDevice<'a> {
    /// Smallest size to correct, in ppem.
    pub start_size: u16,
    /// Largest size to correct, in ppem.
    pub end_size: u16,
    delta_format: u16,
    delta_values: LazyArray16<'a, u16>,
}

impl HintingDevice<'_> {
    /// Returns the adjustment for `ppem`, or 0 when the size is not covered.
    pub fn adjustment(&self, ppem: u16) -> i16 {
        let f = self.delta_format;
        debug_assert!(matches!(f, 1..=3));

        if ppem == 0 || ppem < self.start_size || ppem > self.end_size {
            return 0;
        }

        let s = ppem - self.start_size;
        let word = match self.delta_values.get(s >> (4 - f)) {
            Some(word) => word,
            None => return 0,
        };

        // 2, 4 or 8 bits per value, the first value in the high bits.
        let bits = 1u16 << f;
        let field_index = s & ((1 << (4 - f)) - 1);
        let shift = 16 - bits * (field_index + 1);
        let mask = (1u16 << bits) - 1;

        let field = i32::from((word >> shift) & mask);
        let delta = if field >= i32::from(mask + 1) >> 1 {
            field - i32::from(mask + 1)
        } else {
            field
        };

        delta as i16
    }
}

/// A variation index table.
#[derive(Clone, Copy, Debug)]
pub struct VariationDevice {
    /// Item variation data index.
    pub outer_index: u16,
    /// Delta set index within the item variation data.
    pub inner_index: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_1() {
        // 2-bit deltas for sizes 11..=14: 1, -1, -2, 0
        let data = &[
            0x00, 0x0B, // start size: 11
            0x00, 0x0E, // end size: 14
            0x00, 0x01, // delta format: 1
            0b0111_1000, 0b0000_0000, // deltas
        ];

        let device = Device::parse(data).unwrap().unwrap();
        assert_eq!(device.adjustment(10), 0);
        assert_eq!(device.adjustment(11), 1);
        assert_eq!(device.adjustment(12), -1);
        assert_eq!(device.adjustment(13), -2);
        assert_eq!(device.adjustment(14), 0);
        assert_eq!(device.adjustment(15), 0);
    }

    #[test]
    fn format_2() {
        // 4-bit deltas for sizes 9..=13: 7, -8, 3, -1, 2
        let data = &[
            0x00, 0x09, // start size: 9
            0x00, 0x0D, // end size: 13
            0x00, 0x02, // delta format: 2
            0x78, 0x3F, // deltas 9..=12
            0x20, 0x00, // deltas 13..=16
        ];

        let device = Device::parse(data).unwrap().unwrap();
        assert_eq!(device.adjustment(9), 7);
        assert_eq!(device.adjustment(10), -8);
        assert_eq!(device.adjustment(11), 3);
        assert_eq!(device.adjustment(12), -1);
        assert_eq!(device.adjustment(13), 2);
    }

    #[test]
    fn format_3() {
        let data = &[
            0x00, 0x0C, // start size: 12
            0x00, 0x0E, // end size: 14
            0x00, 0x03, // delta format: 3
            0x7F, 0x80, // 127, -128
            0xFD, 0x00, // -3, padding
        ];

        let device = Device::parse(data).unwrap().unwrap();
        assert_eq!(device.adjustment(12), 127);
        assert_eq!(device.adjustment(13), -128);
        assert_eq!(device.adjustment(14), -3);
    }

    #[test]
    fn zero_ppem() {
        let data = &[
            0x00, 0x00, // start size: 0
            0x00, 0x01, // end size: 1
            0x00, 0x03, // delta format: 3
            0x05, 0x06,
        ];

        let device = Device::parse(data).unwrap().unwrap();
        assert_eq!(device.adjustment(0), 0);
        assert_eq!(device.adjustment(1), 6);
    }

    #[test]
    fn inverted_range() {
        let data = &[
            0x00, 0x0E, // start size: 14
            0x00, 0x0C, // end size: 12
            0x00, 0x01, // delta format: 1
        ];

        let device = Device::parse(data).unwrap().unwrap();
        assert_eq!(device.adjustment(13), 0);
    }

    #[test]
    fn truncated_deltas() {
        let data = &[
            0x00, 0x0C, // start size: 12
            0x00, 0x0E, // end size: 14
            0x00, 0x03, // delta format: 3
            0x7F, 0x80, // 127, -128
            0xFD, // the second word is cut in half
        ];

        let device = Device::parse(data).unwrap().unwrap();
        assert_eq!(device.adjustment(12), 127);
        assert_eq!(device.adjustment(13), -128);
        assert_eq!(device.adjustment(14), 0);
    }

    #[test]
    fn truncated_header() {
        let data = &[
            0x00, 0x0C, // start size: 12
            0x00, 0x0E, // end size: 14
            0x00, // delta format is cut in half
        ];

        assert_eq!(Device::parse(data).unwrap_err(), Error::MalformedFont);
    }

    #[test]
    fn variation_index() {
        let data = &[
            0x00, 0x01, // outer index: 1
            0x00, 0x02, // inner index: 2
            0x80, 0x00, // delta format: 0x8000
        ];

        let device = Device::parse(data).unwrap().unwrap();
        assert!(matches!(
            device,
            Device::Variation(VariationDevice { outer_index: 1, inner_index: 2 })
        ));
        assert_eq!(device.adjustment(12), 0);
    }

    #[test]
    fn unknown_format() {
        let data = &[
            0x00, 0x0C, // start size: 12
            0x00, 0x0E, // end size: 14
            0x00, 0x04, // delta format: 4
        ];

        assert!(Device::parse(data).unwrap().is_none());
        assert!(Device::parse(&[0, 0, 0, 0, 0, 0]).unwrap().is_none());
    }
}
