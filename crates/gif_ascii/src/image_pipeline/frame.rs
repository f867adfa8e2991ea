use std::time::Duration;

use crate::{AsciiError, Result};

/// Delay given to still images, in hundredths of a second.
pub const DEFAULT_FRAME_DELAY: u32 = 10;

/// A decoded frame with RGB or RGBA pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
    /// Display delay in hundredths of a second.
    delay: u32,
}

impl Frame {
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>, delay: u32) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(AsciiError::InputRead {
                path: Default::default(),
                reason: format!("unsupported channel count {channels}"),
            });
        }

        let expected = width as usize * height as usize * usize::from(channels);
        if data.len() != expected {
            return Err(AsciiError::InputRead {
                path: Default::default(),
                reason: format!(
                    "pixel buffer holds {} bytes, expected {expected} for {width}x{height}",
                    data.len()
                ),
            });
        }

        Ok(Self { width, height, channels, data, delay })
    }

    pub fn from_rgba(image: image::RgbaImage, delay: u32) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height, channels: 4, data: image.into_raw(), delay }
    }

    pub fn from_rgb(image: image::RgbImage, delay: u32) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height, channels: 3, data: image.into_raw(), delay }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay) * 10)
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// RGBA value at (x, y). Sources without alpha report 255.
    ///
    /// Panics if the coordinate lies outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let channels = usize::from(self.channels);
        let offset = (y as usize * self.width as usize + x as usize) * channels;
        let px = &self.data[offset..offset + channels];
        [px[0], px[1], px[2], if self.has_alpha() { px[3] } else { 255 }]
    }
}
