//! Recorder — headless playback.
//!
//! Drives the controller with a manual scheduler, a seeded random source and
//! bitmap measurement, collecting every emitted `FrameDescription`. The
//! result is reproducible for a given text, viewport, seed and palette.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::controller::ScreensaverController;
use crate::controller::random::SeededRandom;
use crate::controller::scheduler::ManualScheduler;
use crate::engine::Palette;
use crate::renderer::measure::BitmapMeasure;
use crate::types::{FrameDescription, Viewport};

/// Upper bound on the up-front frame buffer; longer recordings grow on demand.
const PREALLOC_FRAMES: usize = 4096;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub viewport: Viewport,
    pub seed: u64,
    pub font_size: f64,
    pub frames: Vec<FrameDescription>,
}

pub struct Recorder;

impl Recorder {
    pub fn record(
        text: &str,
        viewport: Viewport,
        frame_count: usize,
        seed: u64,
        palette: Palette,
    ) -> Recording {
        let mut controller = ScreensaverController::new(
            viewport,
            palette,
            ManualScheduler::new(),
            SeededRandom::from_seed(seed),
        );
        controller.start(text);

        let mut frames = frame_buffer(frame_count);
        while frames.len() < frame_count {
            let Some(token) = controller.scheduler_mut().fire() else {
                break;
            };
            if let Some(frame) = controller.on_frame(token, &BitmapMeasure) {
                frames.push(frame);
            }
        }

        info!(
            frames = frames.len(),
            bounces = controller.bounce_count(),
            "recording finished"
        );
        let font_size = controller.scaling().font_size;
        controller.stop();

        Recording {
            viewport,
            seed,
            font_size,
            frames,
        }
    }
}

fn frame_buffer(frame_count: usize) -> Vec<FrameDescription> {
    Vec::with_capacity(frame_count.min(PREALLOC_FRAMES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_requested_frame_count() {
        let rec = Recorder::record("ADBE", Viewport::new(640.0, 480.0), 120, 1, Palette::default());
        assert_eq!(rec.frames.len(), 120);
        assert_eq!(rec.font_size, 40.0);
    }

    #[test]
    fn huge_frame_count_caps_preallocation() {
        let frames = frame_buffer(usize::MAX / 8);
        assert!(frames.capacity() >= PREALLOC_FRAMES);
        assert!(frames.capacity() < 1 << 20);
        assert!(frame_buffer(3).capacity() >= 3);
    }

    #[test]
    fn same_seed_same_recording() {
        let a = Recorder::record("MS", Viewport::new(1024.0, 768.0), 30, 9, Palette::default());
        let b = Recorder::record("MS", Viewport::new(1024.0, 768.0), 30, 9, Palette::default());
        assert_eq!(a.frames, b.frames);
    }

    #[test]
    fn recording_serializes() {
        let rec = Recorder::record("X", Viewport::new(320.0, 200.0), 2, 3, Palette::default());
        let json = serde_json::to_string(&rec).unwrap();
        let back: Recording = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frames.len(), 2);
        assert_eq!(back.frames[0].text, "X");
        assert_eq!(back.frames[0].layers[2], rec.frames[0].layers[2]);
    }
}
