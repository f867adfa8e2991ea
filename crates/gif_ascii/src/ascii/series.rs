use std::time::Duration;

use super::grid::GlyphGrid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGridFrame {
    pub grid: GlyphGrid,
    /// Display delay in hundredths of a second.
    pub delay: u32,
}

impl GlyphGridFrame {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay) * 10)
    }
}

/// Glyph grids in display order, each paired with its delay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationSequence {
    frames: Vec<GlyphGridFrame>,
}

impl AnimationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn push_frame(&mut self, frame: GlyphGridFrame) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[GlyphGridFrame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&GlyphGrid> {
        self.frames.get(index).map(|frame| &frame.grid)
    }

    pub fn first(&self) -> Option<&GlyphGrid> {
        self.frame(0)
    }

    pub fn grids(&self) -> impl Iterator<Item = &GlyphGrid> + '_ {
        self.frames.iter().map(|frame| &frame.grid)
    }

    pub fn delays(&self) -> impl Iterator<Item = u32> + '_ {
        self.frames.iter().map(|frame| frame.delay)
    }

    /// Sum of all delays in hundredths of a second.
    pub fn total_delay(&self) -> u64 {
        self.delays().map(u64::from).sum()
    }

    pub fn total_duration(&self) -> Duration {
        self.frames.iter().map(GlyphGridFrame::duration).sum()
    }

    /// Grid dimensions shared by every frame, or `None` if they differ or
    /// the sequence is empty.
    pub fn uniform_dimensions(&self) -> Option<(u16, u16)> {
        let first = self.first()?.dimensions();
        self.grids().all(|grid| grid.dimensions() == first).then_some(first)
    }
}

impl FromIterator<GlyphGridFrame> for AnimationSequence {
    fn from_iter<I: IntoIterator<Item = GlyphGridFrame>>(iter: I) -> Self {
        Self { frames: iter.into_iter().collect() }
    }
}
