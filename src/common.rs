/// A 2D point.
///
/// Depending on context, coordinates are in design units, pixels or
/// the output units of a [`FontInstance`](crate::FontInstance).
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

impl From<(i16, i16)> for Point {
    #[inline]
    fn from((x, y): (i16, i16)) -> Self {
        Point::new(f32::from(x), f32::from(y))
    }
}
