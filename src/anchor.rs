//! Anchor tables.
//!
//! https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#anchor-tables

use ttf_parser::GlyphId;

use crate::device::Device;
use crate::parser::TableView;
use crate::{Error, FontInstance, Point};

/// An anchor table.
#[derive(Clone, Copy, Debug)]
pub enum AnchorTable<'a> {
    /// Design units only.
    Format1(Format1Anchor),
    /// Design units plus a glyph contour point.
    Format2(Format2Anchor),
    /// Design units plus device tables.
    Format3(Format3Anchor<'a>),
}

impl<'a> AnchorTable<'a> {
    /// Parses an anchor table.
    ///
    /// Returns [`Error::UnsupportedFormat`] for formats other than 1, 2 and 3.
    /// In this case only the format field is read.
    pub fn parse(data: &'a [u8]) -> Result<Self, Error> {
        let view = TableView::new(data);
        match view.read_u16(0)? {
            1 => Format1Anchor::parse(view).map(AnchorTable::Format1),
            2 => Format2Anchor::parse(view).map(AnchorTable::Format2),
            3 => Format3Anchor::parse(view).map(AnchorTable::Format3),
            format => Err(Error::UnsupportedFormat(format)),
        }
    }

    /// Returns the anchor position in `font` output units.
    pub fn resolve(&self, glyph_id: GlyphId, font: &impl FontInstance) -> Point {
        match self {
            AnchorTable::Format1(table) => table.resolve(font),
            AnchorTable::Format2(table) => table.resolve(glyph_id, font),
            AnchorTable::Format3(table) => table.resolve(font),
        }
    }

    /// Returns the stored coordinates in design units.
    #[inline]
    pub fn design_coordinates(&self) -> (i16, i16) {
        match self {
            AnchorTable::Format1(table) => (table.x, table.y),
            AnchorTable::Format2(table) => (table.x, table.y),
            AnchorTable::Format3(table) => (table.x, table.y),
        }
    }
}

/// Resolves an anchor table for a glyph.
///
/// Anchor tables with an unknown format resolve to a zero point without an
/// error, so newer fonts keep working with degraded mark placement.
/// Use [`AnchorTable::parse`] to detect them.
///
/// Returns [`Error::MalformedFont`] when the table is truncated
/// or references data outside of `data`.
pub fn resolve_anchor(
    data: &[u8],
    glyph_id: GlyphId,
    font: &impl FontInstance,
) -> Result<Point, Error> {
    match AnchorTable::parse(data) {
        Ok(table) => Ok(table.resolve(glyph_id, font)),
        Err(Error::UnsupportedFormat(format)) => {
            log::debug!("skipping anchor table with an unknown format {}", format);
            Ok(Point::default())
        }
        Err(e) => {
            log::debug!("rejecting anchor for glyph {}: {}", glyph_id.0, e);
            Err(e)
        }
    }
}

/// An anchor table format 1.
#[derive(Clone, Copy, Debug)]
pub struct Format1Anchor {
    /// Horizontal value, in design units.
    pub x: i16,
    /// Vertical value, in design units.
    pub y: i16,
}

impl Format1Anchor {
    fn parse(view: TableView) -> Result<Self, Error> {
        Ok(Format1Anchor {
            x: view.read_i16(2)?,
            y: view.read_i16(4)?,
        })
    }

    /// Returns the anchor position in `font` output units.
    pub fn resolve(&self, font: &impl FontInstance) -> Point {
        let pixels = font.transform_funits(self.x, self.y);
        font.pixels_to_units(pixels)
    }
}

/// An anchor table format 2.
#[derive(Clone, Copy, Debug)]
pub struct Format2Anchor {
    /// Horizontal value, in design units.
    pub x: i16,
    /// Vertical value, in design units.
    pub y: i16,
    /// Index to a glyph contour point.
    pub anchor_point: u16,
}

impl Format2Anchor {
    fn parse(view: TableView) -> Result<Self, Error> {
        Ok(Format2Anchor {
            x: view.read_i16(2)?,
            y: view.read_i16(4)?,
            anchor_point: view.read_u16(6)?,
        })
    }

    /// Returns the anchor position in `font` output units.
    ///
    /// The contour point takes precedence. The design coordinates are used
    /// only when the font cannot provide it.
    pub fn resolve(&self, glyph_id: GlyphId, font: &impl FontInstance) -> Point {
        let pixels = font
            .glyph_point(glyph_id, self.anchor_point)
            .unwrap_or_else(|| font.transform_funits(self.x, self.y));
        font.pixels_to_units(pixels)
    }
}

/// An anchor table format 3.
#[derive(Clone, Copy, Debug)]
pub struct Format3Anchor<'a> {
    /// Horizontal value, in design units.
    pub x: i16,
    /// Vertical value, in design units.
    pub y: i16,
    /// Horizontal pixel adjustments.
    pub x_device: Option<Device<'a>>,
    /// Vertical pixel adjustments.
    pub y_device: Option<Device<'a>>,
}

impl<'a> Format3Anchor<'a> {
    fn parse(view: TableView<'a>) -> Result<Self, Error> {
        let device = |offset| -> Result<Option<Device<'a>>, Error> {
            match view.read_offset16(offset)? {
                Some(offset) => {
                    let data = view.sub_view(offset.to_usize())?.data();
                    Device::parse(data)
                }
                None => Ok(None),
            }
        };

        Ok(Format3Anchor {
            x: view.read_i16(2)?,
            y: view.read_i16(4)?,
            x_device: device(6)?,
            y_device: device(8)?,
        })
    }

    /// Returns the anchor position in `font` output units.
    pub fn resolve(&self, font: &impl FontInstance) -> Point {
        let mut pixels = font.transform_funits(self.x, self.y);

        if let Some(device) = self.x_device {
            pixels.x += f32::from(device.adjustment(font.x_pixels_per_em()));
        }

        if let Some(device) = self.y_device {
            pixels.y += f32::from(device.adjustment(font.y_pixels_per_em()));
        }

        font.pixels_to_units(pixels)
    }
}
