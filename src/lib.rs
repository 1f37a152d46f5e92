/*!
`ot-anchor` resolves OpenType GPOS anchor points.

An anchor is the point of a glyph a mark or a cursive connection attaches to.
This crate reads the three anchor table formats straight from font data,
without copying or allocating, and converts them into output coordinates
through a [`FontInstance`].

```
use ot_anchor::{resolve_anchor, FontInstance, GlyphId, Point};

struct Unscaled;

impl FontInstance for Unscaled {
    fn transform_funits(&self, x: i16, y: i16) -> Point { Point::from((x, y)) }
    fn pixels_to_units(&self, point: Point) -> Point { point }
    fn glyph_point(&self, _: GlyphId, _: u16) -> Option<Point> { None }
    fn x_pixels_per_em(&self) -> u16 { 0 }
    fn y_pixels_per_em(&self) -> u16 { 0 }
}

let data = &[
    0x00, 0x01, // format: 1
    0x00, 0x64, // x: 100
    0xFF, 0xCE, // y: -50
];

let anchor = resolve_anchor(data, GlyphId(0), &Unscaled).unwrap();
assert_eq!(anchor, Point::new(100.0, -50.0));
```

All reads are bounds-checked. Truncated tables and out of range offsets
are reported as [`Error::MalformedFont`].
*/

#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

mod anchor;
mod common;
pub mod device;
mod error;
mod face;
pub mod glyf;
mod instance;
pub mod mark;
pub mod parser;

pub use ttf_parser::GlyphId;

pub use crate::anchor::{resolve_anchor, AnchorTable, Format1Anchor, Format2Anchor, Format3Anchor};
pub use crate::common::Point;
pub use crate::error::Error;
pub use crate::face::ScaledFace;
pub use crate::instance::FontInstance;
