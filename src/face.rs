use ttf_parser::{GlyphId, Tag};

use crate::{glyf, FontInstance, Point};

/// A font face at a specific size.
///
/// Pixel space is design space scaled by `ppem / units_per_em`.
/// The output space is design units again, so resolved anchors can be
/// compared with unscaled glyph metrics.
#[derive(Clone)]
pub struct ScaledFace<'a> {
    face: ttf_parser::Face<'a>,
    units_per_em: u16,
    pixels_per_em: Option<(u16, u16)>,
    glyf: Option<glyf::Table<'a>>,
}

impl<'a> AsRef<ttf_parser::Face<'a>> for ScaledFace<'a> {
    #[inline]
    fn as_ref(&self) -> &ttf_parser::Face<'a> {
        &self.face
    }
}

impl<'a> core::ops::Deref for ScaledFace<'a> {
    type Target = ttf_parser::Face<'a>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.face
    }
}

impl core::fmt::Debug for ScaledFace<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("ScaledFace")
            .field("units_per_em", &self.units_per_em)
            .field("pixels_per_em", &self.pixels_per_em)
            .finish()
    }
}

impl<'a> ScaledFace<'a> {
    /// Creates a new `ScaledFace` from data.
    ///
    /// Data will be referenced, not owned.
    pub fn from_slice(data: &'a [u8], face_index: u32) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, face_index).ok()?;
        Some(Self::from_face(face))
    }

    /// Creates a new `ScaledFace` from [`ttf_parser::Face`].
    pub fn from_face(face: ttf_parser::Face<'a>) -> Self {
        let glyf = {
            let raw = face.raw_face();
            let format = face.tables().head.index_to_location_format;
            raw.table(Tag::from_bytes(b"loca"))
                .zip(raw.table(Tag::from_bytes(b"glyf")))
                .map(|(loca, glyf)| glyf::Table::new(loca, glyf, format))
        };

        ScaledFace {
            units_per_em: face.units_per_em(),
            pixels_per_em: None,
            glyf,
            face,
        }
    }

    /// Returns face's units per EM.
    #[inline]
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Returns pixels per EM.
    #[inline]
    pub fn pixels_per_em(&self) -> Option<(u16, u16)> {
        self.pixels_per_em
    }

    /// Sets pixels per EM.
    ///
    /// `None` by default, which means that pixel space is design space
    /// and device tables are not applied. A zero value has the same effect
    /// on its axis.
    #[inline]
    pub fn set_pixels_per_em(&mut self, ppem: Option<(u16, u16)>) {
        self.pixels_per_em = ppem;
    }

    fn scale(&self) -> (f32, f32) {
        let upem = f32::from(self.units_per_em);
        let axis = |ppem: u16| {
            if ppem == 0 {
                1.0
            } else {
                f32::from(ppem) / upem
            }
        };

        match self.pixels_per_em {
            Some((x, y)) => (axis(x), axis(y)),
            None => (1.0, 1.0),
        }
    }
}

impl FontInstance for ScaledFace<'_> {
    fn transform_funits(&self, x: i16, y: i16) -> Point {
        let (sx, sy) = self.scale();
        Point::new(f32::from(x) * sx, f32::from(y) * sy)
    }

    fn pixels_to_units(&self, point: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(point.x / sx, point.y / sy)
    }

    fn glyph_point(&self, glyph_id: GlyphId, point_index: u16) -> Option<Point> {
        let point = self.glyf?.contour_point(glyph_id, point_index)?;
        let (sx, sy) = self.scale();
        Some(Point::new(point.x * sx, point.y * sy))
    }

    fn x_pixels_per_em(&self) -> u16 {
        self.pixels_per_em.map_or(0, |(x, _)| x)
    }

    fn y_pixels_per_em(&self) -> u16 {
        self.pixels_per_em.map_or(0, |(_, y)| y)
    }
}
