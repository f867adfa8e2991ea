mod ascii;
mod image_pipeline;
mod output;

use std::path::{Path, PathBuf};

use log::debug;

pub use ascii::{
    grid::{CellGlyph, GlyphGrid},
    mapping::GlyphMapper,
    ramp::Ramp,
    series::{AnimationSequence, GlyphGridFrame},
};
pub use image_pipeline::{
    frame::{Frame, DEFAULT_FRAME_DELAY},
    loader::{load_frames, FrameList, FrameSource},
    sample::{GridGeometry, SamplingMode},
};
pub use output::{
    encode::{render_to_gif, render_to_gif_with, GifAnimationEncoder},
    raster::{Canvas, FontGlyphs, GlyphBitmap, GlyphSource, GridRasterizer},
    text_anim::{palette_index, TextAnimation, TextFrame, ANSI_PALETTE},
    text_grid::{write_ascii_grid, write_grid_to},
};

pub type Result<T> = std::result::Result<T, AsciiError>;

#[derive(Debug, thiserror::Error)]
pub enum AsciiError {
    #[error("failed to read input {path:?}: {reason}")]
    InputRead { path: PathBuf, reason: String },
    #[error("failed to load font {path:?}: {reason}")]
    FontLoad { path: PathBuf, reason: String },
    #[error("invalid argument: {0}")]
    Argument(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode animation: {0}")]
    Encode(String),
    #[error("malformed text animation: {0}")]
    Format(String),
    #[error("unsupported layout dimensions")]
    InvalidLayout,
}

impl AsciiError {
    pub(crate) fn input(path: &Path, reason: impl ToString) -> Self {
        AsciiError::InputRead { path: path.to_path_buf(), reason: reason.to_string() }
    }
}

#[derive(Clone, Debug)]
pub struct SampleOptions {
    /// Horizontal and vertical scale, each in (0.0, 1.0].
    pub scale: (f64, f64),
    /// Take each cell's color from the source pixel instead of `fill_color`.
    pub use_color: bool,
    pub fill_color: [u8; 3],
    pub inverse: bool,
    /// Divisor applied to every frame delay. Must be greater than zero.
    pub speed: f64,
    pub ramp: Ramp,
    pub sampling: SamplingMode,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            scale: (1.0, 1.0),
            use_color: false,
            fill_color: [255, 255, 255],
            inverse: false,
            speed: 1.0,
            ramp: Ramp::standard(),
            sampling: SamplingMode::Nearest,
        }
    }
}

impl SampleOptions {
    /// Checks scale and speed ranges.
    pub fn validate(&self) -> Result<()> {
        let (sx, sy) = self.scale;
        if !(sx > 0.0 && sx <= 1.0) || !(sy > 0.0 && sy <= 1.0) {
            return Err(AsciiError::Argument(format!(
                "scale expected to be within (0.0, 1.0], got ({sx}, {sy})"
            )));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(AsciiError::Argument(format!(
                "speed expected to be greater than 0.0, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Turns decoded frames into glyph grids.
#[derive(Default)]
pub struct AsciiSampler;

impl AsciiSampler {
    pub fn sample_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: &SampleOptions,
    ) -> Result<AnimationSequence> {
        options.validate()?;
        let frames = load_frames(path.as_ref())?;
        self.sample(&frames, options)
    }

    pub fn sample(&self, frames: &[Frame], options: &SampleOptions) -> Result<AnimationSequence> {
        let mut source = FrameList::new(frames);
        self.sample_source(&mut source, options)
    }

    pub fn sample_source<S: FrameSource>(
        &self,
        source: &mut S,
        options: &SampleOptions,
    ) -> Result<AnimationSequence> {
        options.validate()?;
        if source.is_empty() {
            return Err(AsciiError::InputRead {
                path: PathBuf::new(),
                reason: "animation contains no frames".into(),
            });
        }

        debug!("sampling {} frames", source.len());
        let mapper = GlyphMapper::new(options.ramp.clone());
        let mut sequence = AnimationSequence::new();

        while let Some(frame) = source.next_frame() {
            let geometry = GridGeometry::derive(frame.width(), frame.height(), options.scale)?;
            let grid = image_pipeline::sample::sample_frame(frame, geometry, &mapper, options);
            let delay = scale_delay(frame.delay(), options.speed);
            sequence.push_frame(GlyphGridFrame { grid, delay });
        }

        debug!(
            "sampled {} frames ({} hundredths of a second total)",
            sequence.len(),
            sequence.total_delay()
        );
        Ok(sequence)
    }
}

/// Divides a delay in hundredths of a second by `speed`, rounding down.
pub fn scale_delay(delay: u32, speed: f64) -> u32 {
    (f64::from(delay) / speed).floor().min(f64::from(u32::MAX)) as u32
}
