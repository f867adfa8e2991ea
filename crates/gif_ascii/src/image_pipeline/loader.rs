use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView};
use log::debug;
use walkdir::WalkDir;

use super::frame::{Frame, DEFAULT_FRAME_DELAY};
use crate::{AsciiError, Result};

pub trait FrameSource {
    fn len(&self) -> usize;
    fn next_frame(&mut self) -> Option<&Frame>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Frames already decoded into memory, yielded in order.
pub struct FrameList<'a> {
    frames: &'a [Frame],
    position: usize,
}

impl<'a> FrameList<'a> {
    pub fn new(frames: &'a [Frame]) -> Self {
        Self { frames, position: 0 }
    }
}

impl FrameSource for FrameList<'_> {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn next_frame(&mut self) -> Option<&Frame> {
        let frame = self.frames.get(self.position)?;
        self.position += 1;
        Some(frame)
    }
}

/// Decodes every frame of `path`: a GIF, a still image, or a directory of stills.
pub fn load_frames(path: &Path) -> Result<Vec<Frame>> {
    let frames = if path.is_dir() {
        load_frames_from_directory(path)?
    } else {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if extension == "gif" {
            load_frames_from_gif(path)?
        } else {
            vec![load_still(path)?]
        }
    };

    if frames.is_empty() {
        return Err(AsciiError::input(path, "animation contains no frames"));
    }
    Ok(frames)
}

fn load_frames_from_gif(path: &Path) -> Result<Vec<Frame>> {
    let file = File::open(path).map_err(|err| AsciiError::input(path, err))?;
    let decoder =
        GifDecoder::new(BufReader::new(file)).map_err(|err| AsciiError::input(path, err))?;
    let frames =
        decoder.into_frames().collect_frames().map_err(|err| AsciiError::input(path, err))?;

    let mut result = Vec::with_capacity(frames.len());
    for frame in frames {
        let (numer, denom) = frame.delay().numer_denom_ms();
        let millis = if denom == 0 { 0 } else { numer / denom };
        let buffer = frame.into_buffer();
        debug!(
            "decoded frame {} ({}x{}, {millis}ms) from {}",
            result.len(),
            buffer.width(),
            buffer.height(),
            path.display()
        );
        result.push(Frame::from_rgba(buffer, millis / 10));
    }

    Ok(result)
}

fn load_still(path: &Path) -> Result<Frame> {
    let image = image::open(path).map_err(|err| AsciiError::input(path, err))?;
    let (width, height) = image.dimensions();
    debug!("decoded still {width}x{height} from {}", path.display());
    Ok(still_frame(image))
}

fn still_frame(image: DynamicImage) -> Frame {
    if image.color().has_alpha() {
        Frame::from_rgba(image.into_rgba8(), DEFAULT_FRAME_DELAY)
    } else {
        Frame::from_rgb(image.into_rgb8(), DEFAULT_FRAME_DELAY)
    }
}

fn load_frames_from_directory(path: &Path) -> Result<Vec<Frame>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    entries.sort();

    entries.iter().map(|entry| load_still(entry)).collect()
}
