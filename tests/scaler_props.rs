//! Property tests for viewport scaling and motion containment.

use proptest::prelude::*;
use vendor_bounce::engine::MotionSimulator;
use vendor_bounce::engine::scaler::{
    MAX_FONT_SIZE, MAX_SPEED_MULTIPLIER, MIN_FONT_SIZE, MIN_SPEED_MULTIPLIER, ViewportScaler,
};
use vendor_bounce::types::{TextExtent, Vec2, Viewport};

proptest! {
    #[test]
    fn scaling_stays_in_range(w in -10_000.0f64..=20_000.0, h in -10_000.0f64..=20_000.0) {
        let p = ViewportScaler::compute(w, h);
        prop_assert!((MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&p.font_size));
        prop_assert!((MIN_SPEED_MULTIPLIER..=MAX_SPEED_MULTIPLIER).contains(&p.speed_multiplier));
    }

    #[test]
    fn scaling_is_symmetric(w in 0.0f64..=5_000.0, h in 0.0f64..=5_000.0) {
        prop_assert_eq!(ViewportScaler::compute(w, h), ViewportScaler::compute(h, w));
    }

    #[test]
    fn position_stays_legal_after_bounce(
        vw in 200.0f64..=4_000.0,
        vh in 200.0f64..=4_000.0,
        tw in 1.0f64..=150.0,
        th in 1.0f64..=150.0,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
        speed in 0.5f64..=3.0,
        steps in 1usize..500,
    ) {
        let view = Viewport::new(vw, vh);
        let text = TextExtent { width: tw, height: th };
        let mut sim = MotionSimulator::new();
        sim.place(Vec2::new(fx * (vw - tw), fy * (vh - th)));
        sim.set_speed_scale(speed);
        for _ in 0..steps {
            sim.step(view, text);
            let p = sim.motion().position;
            prop_assert!(p.x >= 0.0 && p.x + tw <= vw + 1e-9, "x = {}", p.x);
            prop_assert!(p.y >= 0.0 && p.y + th <= vh + 1e-9, "y = {}", p.y);
        }
    }
}
