use ttf_parser::GlyphId;

use crate::Point;

/// A font at a specific size and transform.
///
/// This is everything anchor resolution needs to know about a font.
/// Implementations are expected to be cheap and side-effect free, since
/// anchors are resolved for every attached glyph.
pub trait FontInstance {
    /// Maps design-unit coordinates into pixel space.
    fn transform_funits(&self, x: i16, y: i16) -> Point;

    /// Maps a pixel space point into the output coordinate space.
    fn pixels_to_units(&self, point: Point) -> Point;

    /// Returns a glyph contour point in pixel space.
    ///
    /// Returns `None` when the index is out of range or the glyph
    /// has no outline.
    fn glyph_point(&self, glyph_id: GlyphId, point_index: u16) -> Option<Point>;

    /// Returns the horizontal rendering size. 0 when unknown.
    fn x_pixels_per_em(&self) -> u16;

    /// Returns the vertical rendering size. 0 when unknown.
    fn y_pixels_per_em(&self) -> u16;
}

impl<T: FontInstance + ?Sized> FontInstance for &T {
    #[inline]
    fn transform_funits(&self, x: i16, y: i16) -> Point {
        (**self).transform_funits(x, y)
    }

    #[inline]
    fn pixels_to_units(&self, point: Point) -> Point {
        (**self).pixels_to_units(point)
    }

    #[inline]
    fn glyph_point(&self, glyph_id: GlyphId, point_index: u16) -> Option<Point> {
        (**self).glyph_point(glyph_id, point_index)
    }

    #[inline]
    fn x_pixels_per_em(&self) -> u16 {
        (**self).x_pixels_per_em()
    }

    #[inline]
    fn y_pixels_per_em(&self) -> u16 {
        (**self).y_pixels_per_em()
    }
}
