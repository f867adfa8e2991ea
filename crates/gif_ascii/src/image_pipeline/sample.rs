use std::ops::Range;

use super::{adjust, frame::Frame};
use crate::ascii::{grid::GlyphGrid, mapping::GlyphMapper};
use crate::{AsciiError, Result, SampleOptions};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplingMode {
    /// One source pixel per cell.
    #[default]
    Nearest,
    /// Mean of every source pixel covered by the cell.
    Area,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub columns: u16,
    pub rows: u16,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl GridGeometry {
    /// Output grid of `floor(width * sx)` by `floor(height * sy)` cells.
    pub fn derive(source_width: u32, source_height: u32, scale: (f64, f64)) -> Result<Self> {
        let (scale_x, scale_y) = scale;
        let columns = (f64::from(source_width) * scale_x).floor();
        let rows = (f64::from(source_height) * scale_y).floor();

        if columns > f64::from(u16::MAX) || rows > f64::from(u16::MAX) {
            return Err(AsciiError::InvalidLayout);
        }

        Ok(Self { columns: columns as u16, rows: rows as u16, scale_x, scale_y })
    }

    /// Source pixels covered by output column `x`; starts at `floor(x / sx)`.
    fn span_x(&self, x: u32, source_width: u32) -> Range<u32> {
        span(x, self.scale_x, source_width)
    }

    fn span_y(&self, y: u32, source_height: u32) -> Range<u32> {
        span(y, self.scale_y, source_height)
    }
}

fn span(index: u32, scale: f64, len: u32) -> Range<u32> {
    let last = len.saturating_sub(1);
    let start = ((f64::from(index) / scale).floor() as u32).min(last);
    let end = ((f64::from(index + 1) / scale).floor() as u32).min(len);
    start..end.max(start + 1)
}

pub fn sample_frame(
    frame: &Frame,
    geometry: GridGeometry,
    mapper: &GlyphMapper,
    options: &SampleOptions,
) -> GlyphGrid {
    let fill = if options.use_color { None } else { Some(options.fill_color) };
    let (width, height) = frame.dimensions();
    let mut cells = Vec::with_capacity(usize::from(geometry.columns) * usize::from(geometry.rows));

    for oy in 0..u32::from(geometry.rows) {
        let ys = geometry.span_y(oy, height);
        for ox in 0..u32::from(geometry.columns) {
            let xs = geometry.span_x(ox, width);
            let sample = match options.sampling {
                SamplingMode::Nearest => nearest(frame, xs.start, ys.start),
                SamplingMode::Area => area(frame, xs, ys.clone()),
            };
            cells.push(mapper.map_sample(sample, options.inverse, fill));
        }
    }

    GlyphGrid::new(geometry.columns, geometry.rows, cells)
}

fn nearest(frame: &Frame, x: u32, y: u32) -> Option<[u8; 3]> {
    let [r, g, b, a] = frame.pixel(x, y);
    if frame.has_alpha() && a == 0 {
        None
    } else {
        Some([r, g, b])
    }
}

fn area(frame: &Frame, xs: Range<u32>, ys: Range<u32>) -> Option<[u8; 3]> {
    adjust::average_opaque(ys.flat_map(|y| xs.clone().map(move |x| frame.pixel(x, y))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::{grid::CellGlyph, ramp::Ramp};

    fn checker() -> Frame {
        // 4x2 RGBA: alternating white and black columns, last pixel transparent.
        let mut data = Vec::new();
        for y in 0..2 {
            for x in 0..4 {
                let value = if x % 2 == 0 { 255 } else { 0 };
                let alpha = if (x, y) == (3, 1) { 0 } else { 255 };
                data.extend_from_slice(&[value, value, value, alpha]);
            }
        }
        Frame::new(4, 2, 4, data, 10).unwrap()
    }

    fn run(frame: &Frame, options: &SampleOptions) -> GlyphGrid {
        let geometry = GridGeometry::derive(frame.width(), frame.height(), options.scale).unwrap();
        sample_frame(frame, geometry, &GlyphMapper::new(Ramp::standard()), options)
    }

    #[test]
    fn geometry_floors_scaled_size() {
        let geometry = GridGeometry::derive(10, 7, (0.5, 0.3)).unwrap();
        assert_eq!((geometry.columns, geometry.rows), (5, 2));
        assert!(matches!(
            GridGeometry::derive(200_000, 1, (1.0, 1.0)),
            Err(AsciiError::InvalidLayout)
        ));
    }

    #[test]
    fn spans_cover_whole_source() {
        let geometry = GridGeometry::derive(4, 5, (0.5, 0.5)).unwrap();
        assert_eq!(geometry.span_x(0, 4), 0..2);
        assert_eq!(geometry.span_x(1, 4), 2..4);
        assert_eq!(geometry.span_y(1, 5), 2..4);
        let geometry = GridGeometry::derive(3, 3, (1.0, 1.0)).unwrap();
        assert_eq!(geometry.span_x(2, 3), 2..3);
    }

    #[test]
    fn decimal_scales_floor_exactly() {
        let geometry = GridGeometry::derive(10, 20, (0.7, 0.35)).unwrap();
        assert_eq!((geometry.columns, geometry.rows), (7, 7));

        let geometry = GridGeometry::derive(40, 10, (0.1, 0.1)).unwrap();
        assert_eq!((geometry.columns, geometry.rows), (4, 1));
        assert_eq!(geometry.span_x(3, 40).start, 30);
    }

    #[test]
    fn narrow_source_can_yield_zero_columns() {
        let frame = Frame::new(1, 2, 3, vec![255; 6], 1).unwrap();
        let grid = run(&frame, &SampleOptions { scale: (0.5, 1.0), ..SampleOptions::default() });
        assert_eq!(grid.dimensions(), (0, 2));
        assert_eq!(grid.text_rows().collect::<Vec<_>>(), vec!["", ""]);
    }

    #[test]
    fn nearest_picks_block_origin() {
        let options = SampleOptions { scale: (0.5, 1.0), ..SampleOptions::default() };
        let grid = run(&checker(), &options);
        assert_eq!(grid.text_rows().collect::<Vec<_>>(), vec!["@@", "@@"]);
    }

    #[test]
    fn full_scale_preserves_transparency() {
        let grid = run(&checker(), &SampleOptions::default());
        assert_eq!(grid.text_rows().collect::<Vec<_>>(), vec!["@ @ ", "@ @ "]);
        assert_eq!(grid.cell(3, 1), &CellGlyph::blank());
    }

    #[test]
    fn area_averages_block() {
        let options = SampleOptions {
            scale: (0.5, 1.0),
            sampling: SamplingMode::Area,
            use_color: true,
            ..SampleOptions::default()
        };
        let grid = run(&checker(), &options);
        // Mean of 255 and 0 is 127, which lands on '=' in the standard ramp.
        assert_eq!(grid.cell(0, 0), &CellGlyph::new('=', [127; 3]));
        // Only the opaque white pixel contributes in the lower right block.
        assert_eq!(grid.cell(1, 1), &CellGlyph::new('@', [255; 3]));
    }

    #[test]
    fn rgb_frames_never_blank_out() {
        let frame = Frame::new(2, 1, 3, vec![255, 255, 255, 0, 0, 0], 1).unwrap();
        let grid = run(&frame, &SampleOptions { inverse: true, ..SampleOptions::default() });
        assert_eq!(grid.text_rows().collect::<Vec<_>>(), vec![" @"]);
    }
}
