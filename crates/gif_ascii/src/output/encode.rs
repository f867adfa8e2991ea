use std::io::Write;

use gif::{DisposalMethod, Encoder, Repeat};
use log::{debug, warn};

use super::raster::{Canvas, GlyphSource, GridRasterizer};
use crate::ascii::series::AnimationSequence;
use crate::{AsciiError, Result};

/// Color quantization speed handed to the GIF encoder (1 = best, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Writes canvases as frames of a looping GIF.
pub struct GifAnimationEncoder<W: Write> {
    encoder: Encoder<W>,
    width: u16,
    height: u16,
    frames: usize,
}

fn encode_error(err: impl ToString) -> AsciiError {
    AsciiError::Encode(err.to_string())
}

impl<W: Write> GifAnimationEncoder<W> {
    pub fn new(writer: W, width: u32, height: u32) -> Result<Self> {
        let (width, height) = screen_size(width, height)?;
        let mut encoder = Encoder::new(writer, width, height, &[]).map_err(encode_error)?;
        encoder.set_repeat(Repeat::Infinite).map_err(encode_error)?;
        Ok(Self { encoder, width, height, frames: 0 })
    }

    /// Appends `canvas`, shown for `delay` hundredths of a second and cleared
    /// before the next frame is drawn.
    pub fn push(&mut self, canvas: Canvas, delay: u32) -> Result<()> {
        if (canvas.width(), canvas.height()) != (u32::from(self.width), u32::from(self.height)) {
            return Err(AsciiError::Encode(format!(
                "frame {} is {}x{}, expected {}x{}",
                self.frames,
                canvas.width(),
                canvas.height(),
                self.width,
                self.height
            )));
        }

        let mut pixels = canvas.into_raw();
        let mut frame =
            gif::Frame::from_rgba_speed(self.width, self.height, &mut pixels, QUANTIZE_SPEED);
        frame.delay = u16::try_from(delay).unwrap_or_else(|_| {
            warn!("frame {} delay {delay} clamped to {}", self.frames, u16::MAX);
            u16::MAX
        });
        frame.dispose = DisposalMethod::Background;

        self.encoder.write_frame(&frame).map_err(encode_error)?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn finish(self) -> Result<W> {
        if self.frames == 0 {
            return Err(AsciiError::Encode("animation has no frames".into()));
        }
        self.encoder.into_inner().map_err(AsciiError::Io)
    }
}

fn screen_size(width: u32, height: u32) -> Result<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(AsciiError::Encode(format!("empty canvas {width}x{height}")));
    }
    let fits = |value: u32| {
        u16::try_from(value)
            .map_err(|_| AsciiError::Encode(format!("canvas {width}x{height} exceeds GIF limits")))
    };
    Ok((fits(width)?, fits(height)?))
}

/// Rasterizes every grid of `sequence` and encodes the result as a GIF in memory.
pub fn render_to_gif<G: GlyphSource>(
    sequence: &AnimationSequence,
    glyphs: &mut G,
    back_color: [u8; 4],
) -> Result<Vec<u8>> {
    render_to_gif_with(sequence, glyphs, back_color, |_| {})
}

/// Like [`render_to_gif`], calling `on_frame` with each frame index once it is encoded.
pub fn render_to_gif_with<G, F>(
    sequence: &AnimationSequence,
    glyphs: &mut G,
    back_color: [u8; 4],
    mut on_frame: F,
) -> Result<Vec<u8>>
where
    G: GlyphSource,
    F: FnMut(usize),
{
    let Some(first) = sequence.first() else {
        return Err(AsciiError::Encode("animation has no frames".into()));
    };
    if sequence.uniform_dimensions().is_none() {
        return Err(AsciiError::Encode("frames have mismatched grid dimensions".into()));
    }

    let mut rasterizer = GridRasterizer::new(glyphs, back_color);
    let (width, height) = rasterizer.canvas_size(first)?;
    debug!("encoding {} frames on a {width}x{height} canvas", sequence.len());

    let mut encoder = GifAnimationEncoder::new(Vec::new(), width, height)?;
    for (index, frame) in sequence.frames().iter().enumerate() {
        let canvas = rasterizer.render(&frame.grid)?;
        encoder.push(canvas, frame.delay)?;
        on_frame(index);
    }
    encoder.finish()
}
