use super::{grid::CellGlyph, ramp::Ramp};
use crate::image_pipeline::adjust;

/// Maps sampled source colors to glyph cells.
pub struct GlyphMapper {
    ramp: Ramp,
}

impl GlyphMapper {
    pub fn new(ramp: Ramp) -> Self {
        Self { ramp }
    }

    /// A `sample` of `None` marks a fully transparent source pixel.
    pub fn map_sample(
        &self,
        sample: Option<[u8; 3]>,
        inverse: bool,
        color: Option<[u8; 3]>,
    ) -> CellGlyph {
        let Some(rgb) = sample else {
            return CellGlyph::blank();
        };

        let lum = adjust::adjusted_luminance(rgb, inverse);
        let ch = self.ramp.glyph_for(lum);
        CellGlyph::new(ch, color.unwrap_or(rgb))
    }
}
