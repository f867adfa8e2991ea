use crate::{AsciiError, Result};

/// Characters ordered from visually sparsest to densest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    pub fn new(chars: impl Into<String>) -> Result<Self> {
        let chars: Vec<char> = chars.into().chars().collect();
        if chars.is_empty() {
            return Err(AsciiError::Argument("ramp must contain at least one character".into()));
        }
        Ok(Self { chars })
    }

    fn preset(chars: &str) -> Self {
        Self { chars: chars.chars().collect() }
    }

    pub fn standard() -> Self {
        Self::preset(" .:-=+*#%@")
    }

    pub fn detailed() -> Self {
        Self::preset(" .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$")
    }

    pub fn blocks() -> Self {
        Self::preset(" ░▒▓█")
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Index for a luminance on the 0-255 scale: `floor(lum / 256 * len)`,
    /// clamped into the ramp.
    pub fn index_for(&self, luminance: f32) -> usize {
        let last = self.chars.len() - 1;
        let scaled = (luminance.clamp(0.0, 255.0) / 256.0) * self.chars.len() as f32;
        (scaled.floor() as usize).min(last)
    }

    pub fn char_at(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }

    pub fn glyph_for(&self, luminance: f32) -> char {
        self.char_at(self.index_for(luminance))
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self::standard()
    }
}
