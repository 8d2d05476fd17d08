//! Controller — the screensaver lifecycle state machine.
//!
//! Orchestrates scaler, motion, palette and frame producer under an injected
//! frame scheduler. This is the only component with externally triggerable
//! state: `start`, `stop`, `on_resize`, and the host-driven `on_frame`.

pub mod random;
pub mod scheduler;

use tracing::{debug, trace};

use crate::engine::{FrameProducer, MotionSimulator, Palette, ViewportScaler};
use crate::renderer::measure::TextMeasure;
use crate::types::{FrameDescription, Motion, ScalingParams, Vec2, Viewport};

use random::RandomSource;
use scheduler::{FrameToken, Scheduler};

/// Minimum span of the random start range, used when the estimated text
/// already fills the viewport.
const START_MARGIN_X: f64 = 100.0;
const START_MARGIN_Y: f64 = 50.0;
/// Pre-render size estimate, in multiples of the font size.
const ESTIMATE_WIDTH_EMS: f64 = 8.0;
const ESTIMATE_HEIGHT_EMS: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    /// Running always owns exactly one outstanding frame request.
    Running(FrameToken),
}

pub struct ScreensaverController<S, R> {
    viewport: Viewport,
    scaling: ScalingParams,
    motion: MotionSimulator,
    palette: Palette,
    display: String,
    state: AnimationState,
    scheduler: S,
    random: R,
    frames: u64,
    bounces: u64,
}

impl<S: Scheduler, R: RandomSource> ScreensaverController<S, R> {
    pub fn new(viewport: Viewport, palette: Palette, scheduler: S, random: R) -> Self {
        Self {
            viewport,
            scaling: ViewportScaler::compute(viewport.width, viewport.height),
            motion: MotionSimulator::new(),
            palette,
            display: String::new(),
            state: AnimationState::Idle,
            scheduler,
            random,
            frames: 0,
            bounces: 0,
        }
    }

    /// Begin animating `display`. A running animation is stopped first.
    ///
    /// The caller guarantees a non-empty string; an empty one simply renders
    /// nothing.
    pub fn start(&mut self, display: impl Into<String>) {
        if self.is_running() {
            self.stop();
        }
        self.display = display.into();

        self.scaling = ViewportScaler::compute(self.viewport.width, self.viewport.height);
        self.motion.reset_direction();
        self.motion.set_speed_scale(self.scaling.speed_multiplier);

        let est_w = self.scaling.font_size * ESTIMATE_WIDTH_EMS;
        let est_h = self.scaling.font_size * ESTIMATE_HEIGHT_EMS;
        let span_x = START_MARGIN_X.max(self.viewport.width - est_w);
        let span_y = START_MARGIN_Y.max(self.viewport.height - est_h);
        let position = Vec2::new(
            self.random.next_unit() * span_x,
            self.random.next_unit() * span_y,
        );
        self.motion.place(position);

        self.frames = 0;
        self.bounces = 0;
        let token = self.scheduler.schedule();
        self.state = AnimationState::Running(token);
        debug!(
            text = %self.display,
            font_size = self.scaling.font_size,
            speed = self.scaling.speed_multiplier,
            x = position.x,
            y = position.y,
            "screensaver started"
        );
    }

    /// Run one frame for `token`. Returns `None` when idle or when the token
    /// is not the one currently outstanding (a frame that raced `stop()`).
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        measure: &impl TextMeasure,
    ) -> Option<FrameDescription> {
        if self.state != AnimationState::Running(token) {
            trace!(token = token.id(), "stale frame ignored");
            return None;
        }

        let font_size = self.scaling.font_size;
        let extent = measure.measure(&self.display, font_size);
        let bounce = self.motion.step(self.viewport, extent);
        self.palette.advance_if_bounced(bounce.any());
        if bounce.any() {
            self.bounces += 1;
            trace!(
                x = bounce.x,
                y = bounce.y,
                color = self.palette.current_index(),
                "bounce"
            );
        }

        let frame = FrameProducer::build(
            &self.display,
            self.motion.motion(),
            extent,
            self.palette.current(),
            font_size,
        );
        self.frames += 1;

        let next = self.scheduler.schedule();
        self.state = AnimationState::Running(next);
        Some(frame)
    }

    /// Record a new viewport. While running, scaling is recomputed and the
    /// new speed applies from the next frame; position is left for the next
    /// collision check to correct.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        if !self.is_running() {
            return;
        }
        self.scaling = ViewportScaler::compute(width, height);
        self.motion.set_speed_scale(self.scaling.speed_multiplier);
        debug!(
            width,
            height,
            font_size = self.scaling.font_size,
            speed = self.scaling.speed_multiplier,
            "viewport resized"
        );
    }

    /// Cancel the outstanding frame and return to idle. Safe to call twice.
    pub fn stop(&mut self) {
        let AnimationState::Running(token) = self.state else {
            return;
        };
        self.scheduler.cancel(token);
        self.state = AnimationState::Idle;
        self.display.clear();
        self.palette.reset();
        debug!(frames = self.frames, bounces = self.bounces, "screensaver stopped");
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimationState::Running(_))
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scaling(&self) -> ScalingParams {
        self.scaling
    }

    pub fn motion(&self) -> &Motion {
        self.motion.motion()
    }

    pub fn palette_index(&self) -> usize {
        self.palette.current_index()
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Frames produced since the last `start`.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Frames with at least one bounce since the last `start`.
    pub fn bounce_count(&self) -> u64 {
        self.bounces
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextExtent;
    use scheduler::ManualScheduler;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    struct Boxy;

    impl TextMeasure for Boxy {
        fn measure(&self, text: &str, font_size: f64) -> TextExtent {
            TextExtent {
                width: text.chars().count() as f64 * font_size,
                height: font_size,
            }
        }
    }

    fn controller(w: f64, h: f64, r: f64) -> ScreensaverController<ManualScheduler, Fixed> {
        ScreensaverController::new(
            Viewport::new(w, h),
            Palette::default(),
            ManualScheduler::new(),
            Fixed(r),
        )
    }

    #[test]
    fn idle_until_started() {
        let c = controller(800.0, 600.0, 0.5);
        assert_eq!(c.state(), AnimationState::Idle);
        assert_eq!(c.scheduler().pending(), None);
    }

    #[test]
    fn start_places_text_inside_estimated_bounds() {
        let mut c = controller(1920.0, 1080.0, 0.5);
        c.start("ABC");
        // font 172.8: width span 1920 - 1382.4, height span 1080 - 207.36
        let p = c.motion().position;
        assert!((p.x - 0.5 * (1920.0 - 172.8 * 8.0)).abs() < 1e-9);
        assert!((p.y - 0.5 * (1080.0 - 172.8 * 1.2)).abs() < 1e-9);
        assert!(c.is_running());
    }

    #[test]
    fn start_uses_margin_when_viewport_is_small() {
        let mut c = controller(300.0, 80.0, 1.0);
        c.start("ABC");
        assert_eq!(c.motion().position, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn start_sets_down_right_velocity_scaled() {
        let mut c = controller(1600.0, 900.0, 0.0);
        c.start("X");
        assert_eq!(c.motion().velocity, Vec2::new(4.0, 3.0));
    }

    #[test]
    fn frame_reschedules_and_rejects_stale_tokens() {
        let mut c = controller(800.0, 600.0, 0.25);
        c.start("AB");
        let first = c.scheduler_mut().fire().unwrap();
        assert!(c.on_frame(first, &Boxy).is_some());
        let second = c.scheduler().pending().unwrap();
        assert_ne!(first, second);
        assert!(c.on_frame(first, &Boxy).is_none());
        assert_eq!(c.state(), AnimationState::Running(second));
    }

    #[test]
    fn frame_after_stop_is_ignored() {
        let mut c = controller(800.0, 600.0, 0.25);
        c.start("AB");
        let token = c.scheduler().pending().unwrap();
        c.stop();
        assert!(c.on_frame(token, &Boxy).is_none());
        assert_eq!(c.scheduler().pending(), None);
    }

    #[test]
    fn resize_while_idle_only_stores_viewport() {
        let mut c = controller(800.0, 600.0, 0.25);
        let before = c.motion().velocity;
        c.on_resize(2400.0, 1600.0);
        assert_eq!(c.viewport(), Viewport::new(2400.0, 1600.0));
        assert_eq!(c.motion().velocity, before);
    }

    #[test]
    fn resize_while_running_rescales_speed_not_position() {
        let mut c = controller(800.0, 600.0, 0.25);
        c.start("AB");
        let pos = c.motion().position;
        c.on_resize(2400.0, 1600.0);
        assert_eq!(c.scaling().speed_multiplier, 3.0);
        assert_eq!(c.motion().velocity, Vec2::new(6.0, 4.5));
        assert_eq!(c.motion().position, pos);
    }

    #[test]
    fn stop_clears_text_and_palette() {
        let mut c = controller(150.0, 150.0, 1.0);
        c.start("AB");
        // Starts at x = 100 with an 80px-wide text: the first step hits the right edge.
        let t = c.scheduler_mut().fire().unwrap();
        c.on_frame(t, &Boxy);
        assert_ne!(c.palette_index(), 0);
        c.stop();
        assert_eq!(c.display(), "");
        assert_eq!(c.palette_index(), 0);
        assert_eq!(c.state(), AnimationState::Idle);
    }
}
