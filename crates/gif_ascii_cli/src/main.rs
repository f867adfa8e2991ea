mod cli;
mod logging;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use gif_ascii::{
    render_to_gif_with, write_ascii_grid, AnimationSequence, AsciiSampler, FontGlyphs,
    TextAnimation,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use cli::{Cli, OutputMode};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_level()).context("failed to initialize logging")?;
    run(&cli)
}

/// Output destination, prepared before any frame is decoded.
enum Target {
    Gif(FontGlyphs),
    TextAnimation,
    Grid,
}

fn run(cli: &Cli) -> Result<()> {
    let target = match cli.output_mode() {
        OutputMode::Gif => Target::Gif(
            FontGlyphs::load(&cli.font, cli.size)
                .with_context(|| format!("failed to load font {:?}", cli.font))?,
        ),
        OutputMode::TextAnimation => Target::TextAnimation,
        OutputMode::Grid => Target::Grid,
    };

    let options = cli.to_options();
    let sequence = AsciiSampler
        .sample_path(&cli.input, &options)
        .with_context(|| format!("failed to convert {:?}", cli.input))?;
    info!("converted {} frames from {:?}", sequence.len(), cli.input);

    if cli.preview {
        preview(&sequence);
    }

    match target {
        Target::Gif(mut glyphs) => write_gif(cli, &sequence, &mut glyphs),
        Target::TextAnimation => write_text_animation(cli, &sequence),
        Target::Grid => write_grid(cli, &sequence),
    }
}

fn preview(sequence: &AnimationSequence) {
    if let Some(grid) = sequence.first() {
        for row in grid.text_rows() {
            println!("{}", row);
        }
    }
}

fn write_gif(cli: &Cli, sequence: &AnimationSequence, glyphs: &mut FontGlyphs) -> Result<()> {
    let progress = ProgressBar::new(sequence.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames",
        )
        .context("invalid progress template")?
        .progress_chars("=> "),
    );

    let bytes = render_to_gif_with(sequence, glyphs, cli.back_color(), |_| progress.inc(1))
        .with_context(|| format!("failed to render {:?}", cli.out))?;
    fs::write(&cli.out, bytes).with_context(|| format!("failed to write {:?}", cli.out))?;

    progress.finish_with_message(format!("Wrote {} frames to {:?}", sequence.len(), cli.out));
    Ok(())
}

fn write_text_animation(cli: &Cli, sequence: &AnimationSequence) -> Result<()> {
    let animation = TextAnimation::from_sequence(sequence);
    fs::write(&cli.out, animation.to_string())
        .with_context(|| format!("failed to write {:?}", cli.out))?;
    info!("wrote text animation with {} frames to {:?}", animation.frames.len(), cli.out);
    Ok(())
}

fn write_grid(cli: &Cli, sequence: &AnimationSequence) -> Result<()> {
    let grid = sequence.first().context("animation has no frames")?;
    write_ascii_grid(grid, &cli.out).with_context(|| format!("failed to write {:?}", cli.out))?;
    info!("wrote {}x{} grid to {:?}", grid.width, grid.height, cli.out);
    Ok(())
}
