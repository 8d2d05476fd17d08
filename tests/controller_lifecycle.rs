//! Lifecycle tests driving the controller by hand.

use vendor_bounce::controller::random::RandomSource;
use vendor_bounce::controller::scheduler::ManualScheduler;
use vendor_bounce::controller::{AnimationState, ScreensaverController};
use vendor_bounce::engine::Palette;
use vendor_bounce::renderer::measure::TextMeasure;
use vendor_bounce::types::{TextExtent, Viewport};

/// Replays a fixed list of samples, cycling.
struct Samples {
    values: Vec<f64>,
    next: usize,
}

impl Samples {
    fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for Samples {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

/// Every character is a `font_size`-square box.
struct Boxes;

impl TextMeasure for Boxes {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent {
        TextExtent {
            width: text.chars().count() as f64 * font_size,
            height: font_size,
        }
    }
}

fn controller(
    w: f64,
    h: f64,
    samples: &[f64],
) -> ScreensaverController<ManualScheduler, Samples> {
    ScreensaverController::new(
        Viewport::new(w, h),
        Palette::default(),
        ManualScheduler::new(),
        Samples::new(samples),
    )
}

fn run_frames(c: &mut ScreensaverController<ManualScheduler, Samples>, n: usize) {
    for _ in 0..n {
        let token = c.scheduler_mut().fire().expect("running controller has a pending frame");
        c.on_frame(token, &Boxes).expect("current token yields a frame");
    }
}

#[test]
fn one_token_while_running_none_while_idle() {
    let mut c = controller(1280.0, 720.0, &[0.3]);
    assert_eq!(c.scheduler().pending(), None);

    c.start("ACME");
    for _ in 0..10 {
        let AnimationState::Running(token) = c.state() else {
            panic!("expected running");
        };
        assert_eq!(c.scheduler().pending(), Some(token));
        run_frames(&mut c, 1);
    }

    c.stop();
    assert_eq!(c.state(), AnimationState::Idle);
    assert_eq!(c.scheduler().pending(), None);
}

#[test]
fn stop_twice_matches_stop_once() {
    let mut c = controller(1280.0, 720.0, &[0.3]);
    c.start("ACME");
    run_frames(&mut c, 5);

    c.stop();
    let after_once = (c.state(), c.display().to_string(), c.palette_index());
    let cancels = c.scheduler().cancelled();
    c.stop();
    assert_eq!(after_once, (c.state(), c.display().to_string(), c.palette_index()));
    assert_eq!(c.scheduler().cancelled(), cancels);
    assert_eq!(cancels, 1);
}

#[test]
fn stop_when_never_started_is_harmless() {
    let mut c = controller(640.0, 480.0, &[0.5]);
    c.stop();
    assert_eq!(c.state(), AnimationState::Idle);
    assert_eq!(c.scheduler().cancelled(), 0);
}

#[test]
fn restart_resets_palette_and_draws_new_position() {
    let mut c = controller(400.0, 300.0, &[0.9, 0.9, 0.1, 0.2]);
    c.start("AB");
    // Font 40 → text 80×40 in a 400×300 box; enough frames for several bounces.
    run_frames(&mut c, 400);
    assert!(c.bounce_count() > 0);

    c.stop();
    assert_eq!(c.palette_index(), 0);

    c.start("AB");
    assert_eq!(c.palette_index(), 0);
    assert_eq!(c.bounce_count(), 0);
    let p = c.motion().position;
    // Spans: x = max(100, 400 - 320) = 100, y = max(50, 300 - 48) = 252.
    assert!((p.x - 0.1 * 100.0).abs() < 1e-9);
    assert!((p.y - 0.2 * 252.0).abs() < 1e-9);
}

#[test]
fn start_while_running_restarts_cleanly() {
    let mut c = controller(800.0, 600.0, &[0.5]);
    c.start("ONE");
    let first = c.scheduler().pending().unwrap();
    run_frames(&mut c, 3);

    c.start("TWO");
    assert_eq!(c.display(), "TWO");
    assert_eq!(c.scheduler().cancelled(), 1);
    assert!(c.on_frame(first, &Boxes).is_none());
    assert!(c.is_running());
}

#[test]
fn resize_takes_effect_on_next_frame() {
    let mut c = controller(800.0, 600.0, &[0.0]);
    c.start("AB");
    run_frames(&mut c, 10);
    let before = c.motion().position;
    let vx = c.motion().velocity.x;

    c.on_resize(2400.0, 1800.0);
    assert_eq!(c.motion().position, before);

    run_frames(&mut c, 1);
    let moved = c.motion().position.x - before.x;
    assert!((moved.abs() - 6.0).abs() < 1e-9, "moved {moved}");
    assert_eq!(moved.signum(), vx.signum());
}

#[test]
fn shrinking_viewport_pulls_text_back_inside() {
    let mut c = controller(1600.0, 1200.0, &[0.99]);
    c.start("AB");
    run_frames(&mut c, 1);

    c.on_resize(300.0, 200.0);
    run_frames(&mut c, 1);
    let p = c.motion().position;
    let font = c.scaling().font_size;
    assert!(p.x >= 0.0 && p.x + 2.0 * font <= 300.0);
    assert!(p.y >= 0.0 && p.y + font <= 200.0);
}

#[test]
fn empty_text_does_not_panic() {
    let mut c = controller(800.0, 600.0, &[0.5]);
    c.start("");
    run_frames(&mut c, 50);
    assert!(c.is_running());
}

#[test]
fn degenerate_viewport_never_produces_negative_positions() {
    let mut c = controller(0.0, 0.0, &[0.5]);
    c.start("AB");
    run_frames(&mut c, 20);
    let p = c.motion().position;
    assert_eq!((p.x, p.y), (0.0, 0.0));
    assert_eq!(c.scaling().font_size, 40.0);
    assert_eq!(c.scaling().speed_multiplier, 0.5);
}
