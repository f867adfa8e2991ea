use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::ascii::grid::GlyphGrid;
use crate::Result;

/// Writes the grid's glyphs as newline-terminated rows, ignoring color.
pub fn write_grid_to<W: Write>(grid: &GlyphGrid, mut writer: W) -> Result<()> {
    for row in grid.text_rows() {
        writeln!(writer, "{}", row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_ascii_grid(grid: &GlyphGrid, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_grid_to(grid, BufWriter::new(file))
}
