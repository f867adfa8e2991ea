use core::fmt;
use std::str::FromStr;

use crate::ascii::series::AnimationSequence;
use crate::AsciiError;

const MAGIC: &str = "gifascii-anim 1";

/// The 16 ANSI colors in palette order: black, red, green, yellow, blue,
/// magenta, cyan, white, then their bright variants.
pub const ANSI_PALETTE: [[u8; 3]; 16] = [
    [0, 0, 0],
    [128, 0, 0],
    [0, 128, 0],
    [128, 128, 0],
    [0, 0, 128],
    [128, 0, 128],
    [0, 128, 128],
    [192, 192, 192],
    [128, 128, 128],
    [255, 0, 0],
    [0, 255, 0],
    [255, 255, 0],
    [0, 0, 255],
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 255],
];

/// Index of the nearest ANSI color by squared RGB distance.
pub fn palette_index(rgb: [u8; 3]) -> u8 {
    let distance = |entry: &[u8; 3]| -> u32 {
        (0..3)
            .map(|c| {
                let d = i32::from(rgb[c]) - i32::from(entry[c]);
                (d * d) as u32
            })
            .sum()
    };

    let mut best = 0;
    for (index, entry) in ANSI_PALETTE.iter().enumerate() {
        if distance(entry) < distance(&ANSI_PALETTE[best]) {
            best = index;
        }
    }
    best as u8
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFrame {
    pub width: u16,
    pub height: u16,
    /// Display delay in milliseconds.
    pub delay_ms: u32,
    /// Row-major glyphs.
    pub glyphs: Vec<char>,
    /// Row-major 4-bit palette indices, one per glyph.
    pub palette: Vec<u8>,
}

impl TextFrame {
    fn rows(&self) -> impl Iterator<Item = (&[char], &[u8])> + '_ {
        let width = usize::from(self.width);
        (0..usize::from(self.height)).map(move |row| {
            let range = row * width..(row + 1) * width;
            (&self.glyphs[range.clone()], &self.palette[range])
        })
    }
}

/// Glyph-only animation with coarse per-cell color.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextAnimation {
    pub frames: Vec<TextFrame>,
}

impl TextAnimation {
    pub fn from_sequence(sequence: &AnimationSequence) -> Self {
        let frames = sequence
            .frames()
            .iter()
            .map(|frame| TextFrame {
                width: frame.grid.width,
                height: frame.grid.height,
                delay_ms: frame.delay.saturating_mul(10),
                glyphs: frame.grid.cells.iter().map(|cell| cell.ch).collect(),
                palette: frame.grid.cells.iter().map(|cell| palette_index(cell.color)).collect(),
            })
            .collect();
        Self { frames }
    }
}

impl fmt::Display for TextAnimation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{MAGIC}")?;
        writeln!(f, "frames {}", self.frames.len())?;
        write!(f, "sizes")?;
        for frame in &self.frames {
            write!(f, " {}x{}", frame.width, frame.height)?;
        }
        writeln!(f)?;
        write!(f, "delays")?;
        for frame in &self.frames {
            write!(f, " {}", frame.delay_ms)?;
        }
        writeln!(f)?;

        for (index, frame) in self.frames.iter().enumerate() {
            writeln!(f, "@frame {index}")?;
            for (glyphs, palette) in frame.rows() {
                for ch in glyphs {
                    write!(f, "{ch}")?;
                }
                write!(f, "\t")?;
                for color in palette {
                    write!(f, "{color:x}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn malformed(reason: impl Into<String>) -> AsciiError {
    AsciiError::Format(reason.into())
}

fn keyed<'a>(line: Option<&'a str>, key: &str) -> Result<&'a str, AsciiError> {
    let line = line.ok_or_else(|| malformed(format!("missing {key} line")))?;
    match line.split_once(' ') {
        Some((found, rest)) if found == key => Ok(rest),
        None if line == key => Ok(""),
        _ => Err(malformed(format!("expected {key} line, got {line:?}"))),
    }
}

fn parse_number<T: FromStr>(value: &str) -> Result<T, AsciiError> {
    value.parse::<T>().map_err(|_| malformed(format!("invalid number {value:?}")))
}

impl FromStr for TextAnimation {
    type Err = AsciiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        if lines.next() != Some(MAGIC) {
            return Err(malformed("missing header"));
        }

        let count: usize = parse_number(keyed(lines.next(), "frames")?)?;
        let sizes = keyed(lines.next(), "sizes")?
            .split_whitespace()
            .map(|size| {
                let (w, h) = size
                    .split_once('x')
                    .ok_or_else(|| malformed(format!("invalid size {size:?}")))?;
                Ok((parse_number::<u16>(w)?, parse_number::<u16>(h)?))
            })
            .collect::<Result<Vec<_>, AsciiError>>()?;
        let delays = keyed(lines.next(), "delays")?
            .split_whitespace()
            .map(parse_number::<u32>)
            .collect::<Result<Vec<_>, AsciiError>>()?;
        if sizes.len() != count || delays.len() != count {
            return Err(malformed(format!(
                "{count} frames declared but {} sizes and {} delays given",
                sizes.len(),
                delays.len()
            )));
        }

        let mut frames = Vec::with_capacity(count);
        for (index, ((width, height), delay_ms)) in sizes.into_iter().zip(delays).enumerate() {
            if keyed(lines.next(), "@frame")? != index.to_string() {
                return Err(malformed(format!("frame {index} out of order")));
            }

            let mut glyphs = Vec::with_capacity(usize::from(width) * usize::from(height));
            let mut palette = Vec::with_capacity(glyphs.capacity());
            for row in 0..height {
                let line = lines
                    .next()
                    .ok_or_else(|| malformed(format!("frame {index} is missing row {row}")))?;
                let (text, colors) = line
                    .rsplit_once('\t')
                    .ok_or_else(|| malformed(format!("frame {index} row {row} has no colors")))?;
                let row_glyphs: Vec<char> = text.chars().collect();
                let row_palette = colors
                    .chars()
                    .map(|c| c.to_digit(16).map(|d| d as u8))
                    .collect::<Option<Vec<u8>>>()
                    .ok_or_else(|| malformed(format!("frame {index} row {row} has bad colors")))?;
                if row_glyphs.len() != usize::from(width) || row_palette.len() != row_glyphs.len()
                {
                    return Err(malformed(format!("frame {index} row {row} is not {width} wide")));
                }
                glyphs.extend(row_glyphs);
                palette.extend(row_palette);
            }

            frames.push(TextFrame { width, height, delay_ms, glyphs, palette });
        }

        if lines.any(|line| !line.is_empty()) {
            return Err(malformed("trailing data after last frame"));
        }
        Ok(Self { frames })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::grid::{CellGlyph, GlyphGrid};
    use crate::ascii::series::GlyphGridFrame;

    fn sequence() -> AnimationSequence {
        let first = GlyphGrid::new(
            2,
            2,
            vec![
                CellGlyph::new('@', [255, 255, 255]),
                CellGlyph::new(' ', [0, 0, 0]),
                CellGlyph::new('#', [250, 10, 10]),
                CellGlyph::new('.', [0, 0, 140]),
            ],
        );
        let second = GlyphGrid::new(1, 1, vec![CellGlyph::new('+', [100, 100, 90])]);
        vec![
            GlyphGridFrame { grid: first, delay: 7 },
            GlyphGridFrame { grid: second, delay: 12 },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn palette_picks_nearest_ansi_color() {
        assert_eq!(palette_index([255, 255, 255]), 15);
        assert_eq!(palette_index([0, 0, 0]), 0);
        assert_eq!(palette_index([250, 10, 10]), 9);
        assert_eq!(palette_index([0, 0, 140]), 4);
        assert_eq!(palette_index([200, 200, 200]), 7);
    }

    #[test]
    fn delays_are_scaled_to_milliseconds() {
        let animation = TextAnimation::from_sequence(&sequence());
        let delays: Vec<_> = animation.frames.iter().map(|f| f.delay_ms).collect();
        assert_eq!(delays, vec![70, 120]);
    }

    #[test]
    fn serializes_header_then_frames() {
        let text = TextAnimation::from_sequence(&sequence()).to_string();
        let expected = "gifascii-anim 1\n\
                        frames 2\n\
                        sizes 2x2 1x1\n\
                        delays 70 120\n\
                        @frame 0\n\
                        @ \tf0\n\
                        #.\t94\n\
                        @frame 1\n\
                        +\t8\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn parses_its_own_output() {
        let animation = TextAnimation::from_sequence(&sequence());
        let parsed: TextAnimation = animation.to_string().parse().unwrap();
        assert_eq!(parsed, animation);
    }

    #[test]
    fn rejects_malformed_documents() {
        for text in [
            "",
            "gifascii-anim 1\nframes 1\nsizes 1x1\ndelays\n",
            "gifascii-anim 1\nframes 1\nsizes 1x1\ndelays 10\n@frame 0\nab\t00\n",
            "gifascii-anim 1\nframes 1\nsizes 1x1\ndelays 10\n@frame 0\na\tz\n",
            "gifascii-anim 1\nframes 1\nsizes 1x1\ndelays 10\n@frame 0\n",
        ] {
            let result = text.parse::<TextAnimation>();
            assert!(matches!(result, Err(AsciiError::Format(_))), "{text:?}");
        }
    }
}
