#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGlyph {
    pub ch: char,
    /// Glyph color encoded as RGB bytes.
    pub color: [u8; 3],
}

impl CellGlyph {
    pub fn new(ch: char, color: [u8; 3]) -> Self {
        Self { ch, color }
    }

    /// A cell sampled from a fully transparent pixel.
    pub fn blank() -> Self {
        Self { ch: ' ', color: [0; 3] }
    }
}

/// Row-major grid of glyph cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<CellGlyph>,
}

impl GlyphGrid {
    pub fn new(width: u16, height: u16, cells: Vec<CellGlyph>) -> Self {
        assert_eq!(usize::from(width) * usize::from(height), cells.len());
        Self { width, height, cells }
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn cell(&self, x: u16, y: u16) -> &CellGlyph {
        &self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// One slice per row, including the empty rows of a zero-width grid.
    pub fn rows(&self) -> impl Iterator<Item = &[CellGlyph]> + '_ {
        let width = usize::from(self.width);
        (0..usize::from(self.height)).map(move |row| &self.cells[row * width..(row + 1) * width])
    }

    pub fn text_rows(&self) -> impl Iterator<Item = String> + '_ {
        self.rows().map(|row| row.iter().map(|cell| cell.ch).collect::<String>())
    }
}
