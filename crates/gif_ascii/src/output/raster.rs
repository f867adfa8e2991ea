use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fontdue::{Font, FontSettings, Metrics};
use log::debug;

use crate::ascii::grid::GlyphGrid;
use crate::{AsciiError, Result};

/// Glyph used to measure the cell size.
const REFERENCE_GLYPH: char = '#';

/// Coverage mask of one glyph, positioned relative to its cell's top left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub left: i32,
    pub top: i32,
    pub coverage: Vec<u8>,
}

pub trait GlyphSource {
    /// Pixel size shared by every cell.
    fn cell_size(&self) -> (u32, u32);
    /// Bitmap for `ch`, or `None` when the glyph draws nothing.
    fn glyph(&mut self, ch: char) -> Option<&GlyphBitmap>;
}

pub struct FontGlyphs {
    font: Font,
    px: f32,
    reference: Metrics,
    cache: HashMap<char, Option<GlyphBitmap>>,
}

impl FontGlyphs {
    pub fn load(path: &Path, point_size: u32) -> Result<Self> {
        let bytes = fs::read(path).map_err(|err| AsciiError::FontLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Self::from_bytes(bytes, point_size).map_err(|err| match err {
            AsciiError::FontLoad { reason, .. } => {
                AsciiError::FontLoad { path: path.to_path_buf(), reason }
            },
            other => other,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>, point_size: u32) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| {
            AsciiError::FontLoad { path: Default::default(), reason: reason.to_string() }
        })?;
        let px = point_size.max(1) as f32;
        let reference = font.metrics(REFERENCE_GLYPH, px);
        debug!(
            "font cell {}x{} at {px}px measured from {REFERENCE_GLYPH:?}",
            reference.width, reference.height
        );
        Ok(Self { font, px, reference, cache: HashMap::new() })
    }

    fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
        let (metrics, coverage) = self.font.rasterize(ch, self.px);
        if metrics.width == 0 || metrics.height == 0 {
            return None;
        }

        let baseline = self.reference.ymin + self.reference.height as i32;
        Some(GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            left: metrics.xmin - self.reference.xmin,
            top: baseline - (metrics.ymin + metrics.height as i32),
            coverage,
        })
    }
}

impl GlyphSource for FontGlyphs {
    fn cell_size(&self) -> (u32, u32) {
        (self.reference.width.max(1) as u32, self.reference.height.max(1) as u32)
    }

    fn glyph(&mut self, ch: char) -> Option<&GlyphBitmap> {
        if !self.cache.contains_key(&ch) {
            let bitmap = self.rasterize(ch);
            self.cache.insert(ch, bitmap);
        }
        self.cache.get(&ch).and_then(Option::as_ref)
    }
}

/// RGBA8 render target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: [u8; 4]) -> Self {
        let len = width as usize * height as usize;
        let pixels = background.iter().copied().cycle().take(len * 4).collect();
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2], self.pixels[idx + 3]]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Blends `glyph` in `color` with its origin at pixel (x, y), clipped to the canvas.
    pub fn draw_glyph(&mut self, x: i64, y: i64, glyph: &GlyphBitmap, color: [u8; 3]) {
        for row in 0..glyph.height {
            let py = y + i64::from(glyph.top) + row as i64;
            if py < 0 || py >= i64::from(self.height) {
                continue;
            }

            for col in 0..glyph.width {
                let px = x + i64::from(glyph.left) + col as i64;
                if px < 0 || px >= i64::from(self.width) {
                    continue;
                }
                let mask = glyph.coverage[row * glyph.width + col];
                if mask == 0 {
                    continue;
                }
                let idx = self.index(px as u32, py as u32);
                blend_pixel(&mut self.pixels[idx..idx + 4], color, mask);
            }
        }
    }
}

/// Source-over blend of an opaque color weighted by `coverage`.
fn blend_pixel(dst: &mut [u8], color: [u8; 3], coverage: u8) {
    let src_a = u32::from(coverage);
    let dst_a = u32::from(dst[3]);
    let inv = 255 - src_a;
    let out_a = src_a * 255 + dst_a * inv;
    if out_a == 0 {
        return;
    }

    for channel in 0..3 {
        let src_c = u32::from(color[channel]) * src_a * 255;
        let dst_c = u32::from(dst[channel]) * dst_a * inv;
        dst[channel] = ((src_c + dst_c + out_a / 2) / out_a) as u8;
    }
    dst[3] = ((out_a + 127) / 255) as u8;
}

/// Draws glyph grids onto canvases, one fixed-size cell per glyph.
pub struct GridRasterizer<'a, G: GlyphSource> {
    glyphs: &'a mut G,
    back_color: [u8; 4],
}

impl<'a, G: GlyphSource> GridRasterizer<'a, G> {
    pub fn new(glyphs: &'a mut G, back_color: [u8; 4]) -> Self {
        Self { glyphs, back_color }
    }

    pub fn canvas_size(&self, grid: &GlyphGrid) -> Result<(u32, u32)> {
        let (cell_width, cell_height) = self.glyphs.cell_size();
        let width = cell_width.checked_mul(u32::from(grid.width));
        let height = cell_height.checked_mul(u32::from(grid.height));
        width.zip(height).ok_or(AsciiError::InvalidLayout)
    }

    pub fn render(&mut self, grid: &GlyphGrid) -> Result<Canvas> {
        let (width, height) = self.canvas_size(grid)?;
        let (cell_width, cell_height) = self.glyphs.cell_size();
        let mut canvas = Canvas::new(width, height, self.back_color);

        for (row, cells) in grid.rows().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                let Some(glyph) = self.glyphs.glyph(cell.ch) else {
                    continue;
                };
                let x = column as i64 * i64::from(cell_width);
                let y = row as i64 * i64::from(cell_height);
                canvas.draw_glyph(x, y, glyph, cell.color);
            }
        }

        Ok(canvas)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ascii::grid::CellGlyph;

    /// Fills the whole cell for any non-space glyph.
    pub(crate) struct BlockGlyphs {
        block: GlyphBitmap,
    }

    impl BlockGlyphs {
        pub(crate) fn new(width: usize, height: usize) -> Self {
            let block =
                GlyphBitmap { width, height, left: 0, top: 0, coverage: vec![255; width * height] };
            Self { block }
        }
    }

    impl GlyphSource for BlockGlyphs {
        fn cell_size(&self) -> (u32, u32) {
            (self.block.width as u32, self.block.height as u32)
        }

        fn glyph(&mut self, ch: char) -> Option<&GlyphBitmap> {
            (ch != ' ').then_some(&self.block)
        }
    }

    #[test]
    fn canvas_starts_as_background() {
        let canvas = Canvas::new(2, 3, [1, 2, 3, 4]);
        assert_eq!(canvas.as_raw().len(), 24);
        assert_eq!(canvas.pixel(1, 2), [1, 2, 3, 4]);
    }

    #[test]
    fn blending_over_transparent_keeps_color() {
        let mut px = [0, 0, 0, 0];
        blend_pixel(&mut px, [200, 100, 50], 255);
        assert_eq!(px, [200, 100, 50, 255]);

        let mut px = [0, 0, 0, 0];
        blend_pixel(&mut px, [200, 100, 50], 128);
        assert_eq!(px, [200, 100, 50, 128]);
    }

    #[test]
    fn blending_over_opaque_mixes() {
        let mut px = [0, 0, 0, 255];
        blend_pixel(&mut px, [255, 255, 255], 128);
        assert_eq!(px, [128, 128, 128, 255]);
    }

    #[test]
    fn glyphs_are_clipped_to_canvas() {
        let mut canvas = Canvas::new(2, 2, [0, 0, 0, 255]);
        let glyph =
            GlyphBitmap { width: 2, height: 2, left: -1, top: 1, coverage: vec![255; 4] };
        canvas.draw_glyph(0, 0, &glyph, [9, 9, 9]);
        assert_eq!(canvas.pixel(0, 1), [9, 9, 9, 255]);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn grid_cells_land_in_their_slots() {
        let grid = GlyphGrid::new(
            2,
            1,
            vec![CellGlyph::new('@', [255, 0, 0]), CellGlyph::new(' ', [0, 255, 0])],
        );
        let mut glyphs = BlockGlyphs::new(3, 2);
        let mut rasterizer = GridRasterizer::new(&mut glyphs, [0, 0, 0, 255]);
        assert_eq!(rasterizer.canvas_size(&grid).unwrap(), (6, 2));

        let canvas = rasterizer.render(&grid).unwrap();
        assert_eq!(canvas.pixel(2, 1), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(3, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn missing_font_is_font_error() {
        let result = FontGlyphs::load(Path::new("no/such/font.ttf"), 12);
        assert!(matches!(result, Err(AsciiError::FontLoad { .. })));
    }

    #[test]
    fn garbage_font_is_font_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), b"not a font").unwrap();
        match FontGlyphs::load(file.path(), 12) {
            Err(AsciiError::FontLoad { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected font error, got {:?}", other.map(|_| ())),
        }
    }
}
