use std::{fs, process};

use anyhow::{Context, Result, bail};

use vendor_bounce::{
    config::Config,
    logging,
    player::Player,
    recorder::Recorder,
    types::Viewport,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "vendor-bounce play <text>";
const RECORD_USAGE: &str =
    "vendor-bounce record <text> <frames> <output.json> [--size WxH] [--seed N]";

/// Shown when the supplied text is empty after cleanup.
const FALLBACK_TEXT: &str = "Mystery Font";

fn run() -> Result<()> {
    logging::init()?;
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => {
            let text = args.next().context(PLAY_USAGE)?;
            play(&text)
        }
        Some("record") => {
            let text = args.next().context(RECORD_USAGE)?;
            let frames = args.next().context(RECORD_USAGE)?;
            let output = args.next().context(RECORD_USAGE)?;
            let rest: Vec<String> = args.collect();
            record(&text, &frames, &output, &rest)
        }
        _ => bail!(
            "vendor-bounce — bouncing text screensaver\n\nUsage:\n  {PLAY_USAGE}\n  {RECORD_USAGE}"
        ),
    }
}

fn display_text(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|&c| c != '\0').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FALLBACK_TEXT.to_string()
    } else {
        cleaned.to_string()
    }
}

fn play(text: &str) -> Result<()> {
    let config = Config::load();
    let palette = config.palette().unwrap_or_else(|e| {
        eprintln!("Warning: {e:#}, using default palette");
        Default::default()
    });
    let mut player = Player::new(display_text(text), &config, palette);
    player.play()
}

fn record(text: &str, frames: &str, output: &str, options: &[String]) -> Result<()> {
    let frame_count: usize = frames
        .parse()
        .with_context(|| format!("Invalid frame count {frames:?}"))?;
    let mut viewport = Viewport::new(1920.0, 1080.0);
    let mut seed = 0u64;

    let mut options = options.iter();
    while let Some(flag) = options.next() {
        let value = options.next().with_context(|| format!("Missing value for {flag}"))?;
        match flag.as_str() {
            "--size" => viewport = parse_size(value)?,
            "--seed" => {
                seed = value
                    .parse()
                    .with_context(|| format!("Invalid seed {value:?}"))?
            }
            other => bail!("Unknown option {other}\n\nUsage:\n  {RECORD_USAGE}"),
        }
    }

    let config = Config::load();
    let palette = config.palette()?;
    let recording = Recorder::record(&display_text(text), viewport, frame_count, seed, palette);

    let json = serde_json::to_string_pretty(&recording)?;
    fs::write(output, &json).with_context(|| format!("Failed to write {output}"))?;

    eprintln!(
        "Recorded {} frames at {}x{} (font {:.1}px) -> {}",
        recording.frames.len(),
        viewport.width,
        viewport.height,
        recording.font_size,
        output,
    );

    Ok(())
}

fn parse_size(value: &str) -> Result<Viewport> {
    let (w, h) = value
        .split_once('x')
        .with_context(|| format!("Invalid size {value:?}, expected WxH"))?;
    let width: f64 = w.parse().with_context(|| format!("Invalid width {w:?}"))?;
    let height: f64 = h.parse().with_context(|| format!("Invalid height {h:?}"))?;
    Ok(Viewport::new(width, height))
}
