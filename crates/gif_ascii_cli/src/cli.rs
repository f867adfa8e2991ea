use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use gif_ascii::{Ramp, SampleOptions, SamplingMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert animated images to ASCII art animations")]
pub struct Cli {
    /// Input animation (GIF, still image, or directory of frames)
    #[arg(default_value = "in.gif")]
    pub input: PathBuf,
    /// The file to save the output to
    #[arg(long, default_value = "out.gif")]
    pub out: PathBuf,
    /// Font file used to draw glyphs
    #[arg(long, default_value = "font.ttf")]
    pub font: PathBuf,
    /// Point size of the text
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,
    /// Output scale for x and y, each in (0.0, 1.0]
    #[arg(
        long,
        num_args = 2,
        action = ArgAction::Set,
        value_names = ["X", "Y"],
        value_parser = parse_scale,
        default_values_t = [1.0, 1.0],
    )]
    pub scale: Vec<f64>,
    /// Use the colors of the image instead of the fill color
    #[arg(long, default_value_t = false)]
    pub color: bool,
    /// Playback speed multiplier; every delay is divided by it
    #[arg(long, default_value_t = 1.0, value_parser = parse_speed)]
    pub speed: f64,
    /// Invert luminance before picking glyphs
    #[arg(long, default_value_t = false)]
    pub inverse: bool,
    /// Write a text animation instead of a GIF
    #[arg(long, default_value_t = false)]
    pub ascii: bool,
    /// Write the first frame as plain text rows
    #[arg(long, default_value_t = false)]
    pub grid: bool,
    /// Print the first frame to stdout
    #[arg(long, default_value_t = false)]
    pub preview: bool,
    /// Make the GIF background fully transparent
    #[arg(long, default_value_t = false)]
    pub transparent: bool,
    /// Background color of the GIF
    #[arg(
        long,
        num_args = 3,
        action = ArgAction::Set,
        value_names = ["R", "G", "B"],
        default_values_t = [0, 0, 0],
    )]
    pub backcolor: Vec<u8>,
    /// Glyph color when --color is not set
    #[arg(
        long,
        num_args = 3,
        action = ArgAction::Set,
        value_names = ["R", "G", "B"],
        default_values_t = [255, 255, 255],
    )]
    pub fillcolor: Vec<u8>,
    /// Glyph ramp, sparsest to densest
    #[arg(long, value_enum, default_value = "standard")]
    pub ramp: RampPreset,
    /// How source pixels are picked for each cell
    #[arg(long, value_enum, default_value = "nearest")]
    pub sampling: SamplingChoice,
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RampPreset {
    Standard,
    Detailed,
    Blocks,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SamplingChoice {
    Nearest,
    Area,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Gif,
    TextAnimation,
    Grid,
}

fn parse_scale(value: &str) -> Result<f64, String> {
    let scale: f64 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if scale > 0.0 && scale <= 1.0 {
        Ok(scale)
    } else {
        Err("scale expected to be between 0.0 and 1.0".into())
    }
}

fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err("speed expected to be greater than 0.0".into())
    }
}

fn rgb(values: &[u8]) -> [u8; 3] {
    [values[0], values[1], values[2]]
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.grid {
            OutputMode::Grid
        } else if self.ascii {
            OutputMode::TextAnimation
        } else {
            OutputMode::Gif
        }
    }

    pub fn to_options(&self) -> SampleOptions {
        SampleOptions {
            scale: (self.scale[0], self.scale[1]),
            use_color: self.color,
            fill_color: rgb(&self.fillcolor),
            inverse: self.inverse,
            speed: self.speed,
            ramp: self.ramp.to_ramp(),
            sampling: self.sampling.to_mode(),
        }
    }

    pub fn back_color(&self) -> [u8; 4] {
        let [r, g, b] = rgb(&self.backcolor);
        [r, g, b, if self.transparent { 0 } else { 255 }]
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

impl RampPreset {
    fn to_ramp(self) -> Ramp {
        match self {
            RampPreset::Standard => Ramp::standard(),
            RampPreset::Detailed => Ramp::detailed(),
            RampPreset::Blocks => Ramp::blocks(),
        }
    }
}

impl SamplingChoice {
    fn to_mode(self) -> SamplingMode {
        match self {
            SamplingChoice::Nearest => SamplingMode::Nearest,
            SamplingChoice::Area => SamplingMode::Area,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("giftoascii").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.gif"));
        assert_eq!(cli.out, PathBuf::from("out.gif"));
        assert_eq!(cli.font, PathBuf::from("font.ttf"));
        assert_eq!(cli.size, 12);
        assert_eq!(cli.output_mode(), OutputMode::Gif);
        assert_eq!(cli.back_color(), [0, 0, 0, 255]);

        let options = cli.to_options();
        assert_eq!(options.scale, (1.0, 1.0));
        assert_eq!(options.speed, 1.0);
        assert_eq!(options.fill_color, [255, 255, 255]);
        assert!(!options.use_color && !options.inverse);
        assert_eq!(options.ramp, Ramp::standard());
    }

    #[test]
    fn parses_every_flag() {
        let cli = parse(&[
            "anim.gif", "--scale", "0.5", "0.25", "--font", "mono.ttf", "--out", "x.txt",
            "--size", "16", "--color", "--speed", "2.5", "--inverse", "--ascii",
            "--transparent", "--backcolor", "1", "2", "3", "--fillcolor", "4", "5", "6",
            "--sampling", "area", "-vv",
        ])
        .unwrap();

        assert_eq!(cli.input, PathBuf::from("anim.gif"));
        assert_eq!(cli.size, 16);
        assert_eq!(cli.output_mode(), OutputMode::TextAnimation);
        assert_eq!(cli.back_color(), [1, 2, 3, 0]);
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);

        let options = cli.to_options();
        assert_eq!(options.scale, (0.5, 0.25));
        assert_eq!(options.speed, 2.5);
        assert_eq!(options.fill_color, [4, 5, 6]);
        assert!(options.use_color && options.inverse);
        assert_eq!(options.sampling, SamplingMode::Area);
    }

    #[test]
    fn decimal_scale_and_speed_keep_their_value() {
        let options = parse(&["--scale", "0.7", "0.1", "--speed", "0.1"]).unwrap().to_options();
        assert_eq!(options.scale, (0.7, 0.1));
        assert_eq!(options.speed, 0.1);
        assert_eq!(gif_ascii::scale_delay(10, options.speed), 100);
    }

    #[test]
    fn grid_wins_over_ascii() {
        assert_eq!(parse(&["--ascii", "--grid"]).unwrap().output_mode(), OutputMode::Grid);
    }

    #[test]
    fn rejects_out_of_range_scale() {
        let err = parse(&["--scale", "1.5", "1.0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(parse(&["--scale", "0", "1"]).is_err());
        assert!(parse(&["--scale", "0.5"]).is_err());
    }

    #[test]
    fn rejects_bad_speed_and_colors() {
        assert!(parse(&["--speed", "0"]).is_err());
        assert!(parse(&["--speed", "-1"]).is_err());
        assert!(parse(&["--backcolor", "256", "0", "0"]).is_err());
        assert!(parse(&["--fillcolor", "1", "2"]).is_err());
        assert!(parse(&["--size", "0"]).is_err());
    }

    #[test]
    fn help_is_reported_as_display_help() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
