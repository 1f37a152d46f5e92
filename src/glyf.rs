//! Contour points of TrueType glyphs.
//!
//! https://docs.microsoft.com/en-us/typography/opentype/spec/glyf

use ttf_parser::head::IndexToLocationFormat;
use ttf_parser::GlyphId;

use crate::parser::Stream;
use crate::Point;

// OpenType sets no nesting limit for composite glyphs.
const MAX_COMPONENTS: u8 = 32;

// Upper bound on glyph records visited by a single lookup.
// Protects against composite glyphs that reference each other many times.
const MAX_VISITED_GLYPHS: u16 = 1024;

bitflags::bitflags! {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/glyf#simple-glyph-description
    #[derive(Clone, Copy, Debug)]
    struct SimpleGlyphFlags: u8 {
        const ON_CURVE_POINT = 1 << 0;
        const X_SHORT_VECTOR = 1 << 1;
        const Y_SHORT_VECTOR = 1 << 2;
        const REPEAT_FLAG = 1 << 3;
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 1 << 4;
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 1 << 5;
    }
}

bitflags::bitflags! {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/glyf#composite-glyph-description
    #[derive(Clone, Copy, Debug)]
    struct CompositeGlyphFlags: u16 {
        const ARG_1_AND_2_ARE_WORDS = 1 << 0;
        const ARGS_ARE_XY_VALUES = 1 << 1;
        const WE_HAVE_A_SCALE = 1 << 3;
        const MORE_COMPONENTS = 1 << 5;
        const WE_HAVE_AN_X_AND_Y_SCALE = 1 << 6;
        const WE_HAVE_A_TWO_BY_TWO = 1 << 7;
    }
}

/// A view over the `loca` and `glyf` tables.
#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    loca: &'a [u8],
    glyf: &'a [u8],
    format: IndexToLocationFormat,
}

impl<'a> Table<'a> {
    /// Creates a new table from raw `loca` and `glyf` data.
    pub fn new(loca: &'a [u8], glyf: &'a [u8], format: IndexToLocationFormat) -> Self {
        Table { loca, glyf, format }
    }

    /// Returns a glyph contour point in design units.
    ///
    /// Composite glyph points are the points of their components, in order,
    /// with the component transform applied. Components positioned by point
    /// matching are not moved.
    pub fn contour_point(&self, glyph_id: GlyphId, index: u16) -> Option<Point> {
        let mut budget = MAX_VISITED_GLYPHS;
        self.contour_point_impl(glyph_id, index, 0, &mut budget)
    }

    /// Returns the number of contour points of a glyph.
    pub fn points_count(&self, glyph_id: GlyphId) -> Option<u16> {
        let mut budget = MAX_VISITED_GLYPHS;
        self.points_count_impl(glyph_id, 0, &mut budget)
    }

    /// Returns glyph data. Empty glyphs have empty data.
    fn glyph_data(&self, glyph_id: GlyphId) -> Option<&'a [u8]> {
        let idx = usize::from(glyph_id.0);
        let (start, end) = match self.format {
            IndexToLocationFormat::Short => {
                let start = Stream::read_at::<u16>(self.loca, idx * 2)?;
                let end = Stream::read_at::<u16>(self.loca, (idx + 1) * 2)?;
                (usize::from(start) * 2, usize::from(end) * 2)
            }
            IndexToLocationFormat::Long => {
                let start = Stream::read_at::<u32>(self.loca, idx * 4)?;
                let end = Stream::read_at::<u32>(self.loca, (idx + 1) * 4)?;
                (start as usize, end as usize)
            }
        };

        if start > end {
            return None;
        }

        self.glyf.get(start..end)
    }

    fn points_count_impl(&self, glyph_id: GlyphId, depth: u8, budget: &mut u16) -> Option<u16> {
        if depth >= MAX_COMPONENTS {
            return None;
        }

        *budget = budget.checked_sub(1)?;

        let data = self.glyph_data(glyph_id)?;
        if data.is_empty() {
            return Some(0);
        }

        let mut s = Stream::new(data);
        let number_of_contours = s.read::<i16>()?;
        s.advance(8); // skip bbox

        if number_of_contours > 0 {
            let endpoints = s.read_array16::<u16>(number_of_contours as u16)?;
            endpoints.last()?.checked_add(1)
        } else if number_of_contours < 0 {
            let mut total = 0u16;
            for component in CompositeComponents::new(s.tail()?) {
                let count = self.points_count_impl(component.glyph_id, depth + 1, budget)?;
                total = total.checked_add(count)?;
            }

            Some(total)
        } else {
            Some(0)
        }
    }

    fn contour_point_impl(
        &self,
        glyph_id: GlyphId,
        index: u16,
        depth: u8,
        budget: &mut u16,
    ) -> Option<Point> {
        if depth >= MAX_COMPONENTS {
            return None;
        }

        *budget = budget.checked_sub(1)?;

        let data = self.glyph_data(glyph_id)?;
        let mut s = Stream::new(data);
        let number_of_contours = s.read::<i16>()?;
        s.advance(8); // skip bbox

        if number_of_contours > 0 {
            simple_glyph_point(s.tail()?, number_of_contours as u16, index)
        } else if number_of_contours < 0 {
            let mut base = 0u16;
            for component in CompositeComponents::new(s.tail()?) {
                let count = self.points_count_impl(component.glyph_id, depth + 1, budget)?;
                let end = base.checked_add(count)?;
                if index < end {
                    let point =
                        self.contour_point_impl(component.glyph_id, index - base, depth + 1, budget)?;
                    return Some(component.apply_to(point));
                }

                base = end;
            }

            None
        } else {
            // An empty glyph.
            None
        }
    }
}

fn simple_glyph_point(glyph_data: &[u8], number_of_contours: u16, index: u16) -> Option<Point> {
    let mut s = Stream::new(glyph_data);
    let endpoints = s.read_array16::<u16>(number_of_contours)?;
    let points_total = endpoints.last()?.checked_add(1)?;
    if index >= points_total {
        return None;
    }

    let instructions_len = s.read::<u16>()?;
    s.advance(usize::from(instructions_len));

    let flags_offset = s.offset();
    let x_coords_len = resolve_x_coords_len(&mut s, points_total)?;
    let x_coords_offset = s.offset();
    let y_coords_offset = x_coords_offset + x_coords_len;

    let mut points = GlyphPoints {
        flags: Stream::new(glyph_data.get(flags_offset..x_coords_offset)?),
        x_coords: Stream::new(glyph_data.get(x_coords_offset..y_coords_offset)?),
        y_coords: Stream::new(glyph_data.get(y_coords_offset..)?),
        points_left: points_total,
        flag_repeats: 0,
        last_flags: SimpleGlyphFlags::empty(),
        x: 0,
        y: 0,
    };

    let (x, y) = points.nth(usize::from(index))?;
    Some(Point::from((x, y)))
}

/// Resolves the X coordinates length.
///
/// The length depends on *Simple Glyph Flags*, so we have to process them all to find it.
fn resolve_x_coords_len(s: &mut Stream, points_total: u16) -> Option<usize> {
    type Flags = SimpleGlyphFlags;

    let mut flags_left = u32::from(points_total);
    let mut x_coords_len = 0;
    while flags_left > 0 {
        let flags = Flags::from_bits_truncate(s.read::<u8>()?);

        // The number of times a glyph point repeats.
        let repeats = if flags.contains(Flags::REPEAT_FLAG) {
            u32::from(s.read::<u8>()?) + 1
        } else {
            1
        };

        if repeats > flags_left {
            return None;
        }

        if flags.contains(Flags::X_SHORT_VECTOR) {
            // Coordinate is 1 byte long.
            x_coords_len += repeats as usize;
        } else if !flags.contains(Flags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
            // Coordinate is 2 bytes long.
            x_coords_len += repeats as usize * 2;
        }

        flags_left -= repeats;
    }

    Some(x_coords_len)
}

struct GlyphPoints<'a> {
    flags: Stream<'a>,
    x_coords: Stream<'a>,
    y_coords: Stream<'a>,
    points_left: u16,
    flag_repeats: u8,
    last_flags: SimpleGlyphFlags,
    x: i16,
    y: i16,
}

impl Iterator for GlyphPoints<'_> {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<Self::Item> {
        type Flags = SimpleGlyphFlags;

        if self.points_left == 0 {
            return None;
        }

        if self.flag_repeats == 0 {
            self.last_flags = Flags::from_bits_truncate(self.flags.read::<u8>()?);
            if self.last_flags.contains(Flags::REPEAT_FLAG) {
                self.flag_repeats = self.flags.read::<u8>()?;
            }
        } else {
            self.flag_repeats -= 1;
        }

        let x = glyph_coord(
            self.last_flags,
            Flags::X_SHORT_VECTOR,
            Flags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            &mut self.x_coords,
        )?;
        self.x = self.x.wrapping_add(x);

        let y = glyph_coord(
            self.last_flags,
            Flags::Y_SHORT_VECTOR,
            Flags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            &mut self.y_coords,
        )?;
        self.y = self.y.wrapping_add(y);

        self.points_left -= 1;

        Some((self.x, self.y))
    }
}

fn glyph_coord(
    flags: SimpleGlyphFlags,
    short_vector: SimpleGlyphFlags,
    is_same_or_positive_short_vector: SimpleGlyphFlags,
    coords: &mut Stream,
) -> Option<i16> {
    let flags = (
        flags.contains(short_vector),
        flags.contains(is_same_or_positive_short_vector),
    );

    Some(match flags {
        (true, true) => i16::from(coords.read::<u8>()?),
        (true, false) => -i16::from(coords.read::<u8>()?),
        // Keep previous coordinate.
        (false, true) => 0,
        (false, false) => coords.read::<i16>()?,
    })
}

#[derive(Clone, Copy, Debug)]
struct Component {
    glyph_id: GlyphId,
    flags: CompositeGlyphFlags,
    dx: f32,
    dy: f32,
    // 2x2 matrix: [a c; b d].
    a: f32,
    b: f32,
    c: f32,
    d: f32,
}

impl Component {
    fn apply_to(&self, p: Point) -> Point {
        let mut x = self.a * p.x + self.c * p.y;
        let mut y = self.b * p.x + self.d * p.y;
        if self.flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES) {
            x += self.dx;
            y += self.dy;
        }

        Point::new(x, y)
    }
}

struct CompositeComponents<'a> {
    s: Stream<'a>,
    done: bool,
}

impl<'a> CompositeComponents<'a> {
    fn new(data: &'a [u8]) -> Self {
        CompositeComponents {
            s: Stream::new(data),
            done: false,
        }
    }

    fn parse_next(&mut self) -> Option<Component> {
        type Flags = CompositeGlyphFlags;

        let flags = Flags::from_bits_truncate(self.s.read::<u16>()?);
        let glyph_id = GlyphId(self.s.read::<u16>()?);

        let (dx, dy) = match (
            flags.contains(Flags::ARG_1_AND_2_ARE_WORDS),
            flags.contains(Flags::ARGS_ARE_XY_VALUES),
        ) {
            (true, true) => (
                f32::from(self.s.read::<i16>()?),
                f32::from(self.s.read::<i16>()?),
            ),
            (false, true) => (
                f32::from(self.s.read::<i8>()?),
                f32::from(self.s.read::<i8>()?),
            ),
            // Point numbers to match.
            (true, false) => {
                self.s.advance(4);
                (0.0, 0.0)
            }
            (false, false) => {
                self.s.advance(2);
                (0.0, 0.0)
            }
        };

        let mut component = Component {
            glyph_id,
            flags,
            dx,
            dy,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
        };

        if flags.contains(Flags::WE_HAVE_A_TWO_BY_TWO) {
            component.a = read_f2_14(&mut self.s)?;
            component.b = read_f2_14(&mut self.s)?;
            component.c = read_f2_14(&mut self.s)?;
            component.d = read_f2_14(&mut self.s)?;
        } else if flags.contains(Flags::WE_HAVE_AN_X_AND_Y_SCALE) {
            component.a = read_f2_14(&mut self.s)?;
            component.d = read_f2_14(&mut self.s)?;
        } else if flags.contains(Flags::WE_HAVE_A_SCALE) {
            component.a = read_f2_14(&mut self.s)?;
            component.d = component.a;
        }

        if !flags.contains(Flags::MORE_COMPONENTS) {
            self.done = true;
        }

        Some(component)
    }
}

impl Iterator for CompositeComponents<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let component = self.parse_next();
        if component.is_none() {
            self.done = true;
        }

        component
    }
}

#[inline]
fn read_f2_14(s: &mut Stream) -> Option<f32> {
    Some(f32::from(s.read::<i16>()?) / 16384.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCA: &[u8] = &[
        0x00, 0x00, // glyph 0: empty
        0x00, 0x00, // glyph 1: 0..24
        0x00, 0x0C, // glyph 2: 24..50
        0x00, 0x19, // glyph 3: 50..66
        0x00, 0x21, // end
    ];

    const GLYF: &[u8] = &[
        // Glyph 1, simple.
        0x00, 0x01, // number of contours: 1
        0x00, 0x64, 0x00, 0x00, 0x01, 0x2C, 0x01, 0x2C, // bbox
        0x00, 0x02, // end point of contour 0: 2
        0x00, 0x00, // instructions length: 0
        0x33, // flags: on curve, x: +short, y: same
        0x12, // flags: off curve, x: +short, y: word
        0x13, // flags: on curve, x: +short, y: word
        0x64, 0x64, 0x64, // x deltas: 100, 100, 100
        0x01, 0x2C, // y delta: 300
        0xFE, 0xD4, // y delta: -300
        // Glyph 2, composite.
        0xFF, 0xFF, // number of contours: -1
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // bbox
        0x00, 0x23, // flags: words, xy values, more components
        0x00, 0x01, // glyph: 1
        0x00, 0x0A, // dx: 10
        0x00, 0x14, // dy: 20
        0x00, 0x0A, // flags: xy values, scale
        0x00, 0x01, // glyph: 1
        0xFB, // dx: -5
        0x05, // dy: 5
        0x20, 0x00, // scale: 0.5
        // Glyph 3, references itself.
        0xFF, 0xFF, // number of contours: -1
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // bbox
        0x00, 0x02, // flags: xy values
        0x00, 0x03, // glyph: 3
        0x00, 0x00, // dx, dy
    ];

    fn table() -> Table<'static> {
        Table::new(LOCA, GLYF, IndexToLocationFormat::Short)
    }

    #[test]
    fn simple_glyph() {
        let table = table();
        assert_eq!(table.points_count(GlyphId(1)), Some(3));
        assert_eq!(table.contour_point(GlyphId(1), 0), Some(Point::new(100.0, 0.0)));
        assert_eq!(table.contour_point(GlyphId(1), 1), Some(Point::new(200.0, 300.0)));
        assert_eq!(table.contour_point(GlyphId(1), 2), Some(Point::new(300.0, 0.0)));
        assert_eq!(table.contour_point(GlyphId(1), 3), None);
    }

    #[test]
    fn composite_glyph() {
        let table = table();
        assert_eq!(table.points_count(GlyphId(2)), Some(6));
        assert_eq!(table.contour_point(GlyphId(2), 0), Some(Point::new(110.0, 20.0)));
        assert_eq!(table.contour_point(GlyphId(2), 2), Some(Point::new(310.0, 20.0)));
        assert_eq!(table.contour_point(GlyphId(2), 3), Some(Point::new(45.0, 5.0)));
        assert_eq!(table.contour_point(GlyphId(2), 4), Some(Point::new(95.0, 155.0)));
        assert_eq!(table.contour_point(GlyphId(2), 5), Some(Point::new(145.0, 5.0)));
        assert_eq!(table.contour_point(GlyphId(2), 6), None);
    }

    #[test]
    fn empty_glyph() {
        let table = table();
        assert_eq!(table.points_count(GlyphId(0)), Some(0));
        assert_eq!(table.contour_point(GlyphId(0), 0), None);
    }

    #[test]
    fn self_referencing_glyph() {
        let table = table();
        assert_eq!(table.points_count(GlyphId(3)), None);
        assert_eq!(table.contour_point(GlyphId(3), 0), None);
    }

    #[test]
    fn glyph_out_of_range() {
        assert_eq!(table().contour_point(GlyphId(4), 0), None);
    }

    #[test]
    fn long_offsets() {
        let loca = &[
            0x00, 0x00, 0x00, 0x00, // glyph 0: 0..24
            0x00, 0x00, 0x00, 0x18, // end
        ];

        let table = Table::new(loca, &GLYF[..24], IndexToLocationFormat::Long);
        assert_eq!(table.contour_point(GlyphId(0), 1), Some(Point::new(200.0, 300.0)));
    }

    #[test]
    fn truncated_coordinates() {
        let loca = &[0x00, 0x00, 0x00, 0x0B];
        let table = Table::new(loca, &GLYF[..22], IndexToLocationFormat::Short);
        assert_eq!(table.contour_point(GlyphId(0), 0), Some(Point::new(100.0, 0.0)));
        assert_eq!(table.contour_point(GlyphId(0), 2), None);
    }
}
