use crate::types::{Motion, TextExtent, Vec2, Viewport};

/// Horizontal speed in pixels per step at a speed multiplier of 1.
pub const BASE_SPEED: f64 = 2.0;
/// Vertical drift runs slower than horizontal.
pub const VERTICAL_SPEED_RATIO: f64 = 0.75;

/// Which axes reflected during a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

impl Bounce {
    pub fn any(self) -> bool {
        self.x || self.y
    }
}

#[derive(Debug, Clone)]
pub struct MotionSimulator {
    motion: Motion,
}

impl MotionSimulator {
    pub fn new() -> Self {
        Self {
            motion: Motion {
                position: Vec2::new(0.0, 0.0),
                velocity: Vec2::new(BASE_SPEED, BASE_SPEED * VERTICAL_SPEED_RATIO),
            },
        }
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn place(&mut self, position: Vec2) {
        self.motion.position = position;
    }

    /// Point the velocity down-right (+x, +y) without changing its magnitude.
    pub fn reset_direction(&mut self) {
        self.motion.velocity.x = self.motion.velocity.x.abs();
        self.motion.velocity.y = self.motion.velocity.y.abs();
    }

    /// Rescale speed, keeping the current direction on both axes.
    ///
    /// A zero component counts as negative.
    pub fn set_speed_scale(&mut self, speed_multiplier: f64) {
        let v = &mut self.motion.velocity;
        let sx = if v.x > 0.0 { 1.0 } else { -1.0 };
        let sy = if v.y > 0.0 { 1.0 } else { -1.0 };
        v.x = sx * BASE_SPEED * speed_multiplier;
        v.y = sy * BASE_SPEED * speed_multiplier * VERTICAL_SPEED_RATIO;
    }

    /// Advance one step and reflect off any viewport edge that was reached.
    ///
    /// Edges are inclusive: touching `0` or `viewport - extent` counts as a
    /// bounce. After a bounce the position is clamped into
    /// `[0, viewport - extent]`, flooring at 0 when the text is larger than
    /// the viewport (the text then overflows to the right/bottom).
    pub fn step(&mut self, viewport: Viewport, extent: TextExtent) -> Bounce {
        let Motion { position, velocity } = &mut self.motion;
        position.x += velocity.x;
        position.y += velocity.y;

        let x = reflect(&mut position.x, &mut velocity.x, extent.width, viewport.width);
        let y = reflect(&mut position.y, &mut velocity.y, extent.height, viewport.height);
        Bounce { x, y }
    }
}

impl Default for MotionSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn reflect(pos: &mut f64, vel: &mut f64, size: f64, limit: f64) -> bool {
    if *pos <= 0.0 || *pos + size >= limit {
        *vel = -*vel;
        *pos = pos.min(limit - size).max(0.0);
        true
    } else {
        false
    }
}
