use crate::types::{Color, FrameDescription, GlowLayer, Motion, NamedColor, TextExtent};

/// Outer glow radius as a fraction of the font size; the mid layer uses half.
const GLOW_DIVISOR: f64 = 3.0;

pub struct FrameProducer;

impl FrameProducer {
    /// Describe one frame: the text at the current position, drawn three
    /// times back-to-front with shrinking blur (outer, mid, core) in one colour.
    ///
    /// The layering fakes a bloom by overdraw; it never blends colours.
    pub fn build(
        text: &str,
        motion: &Motion,
        extent: TextExtent,
        color: &Color,
        font_size: f64,
    ) -> FrameDescription {
        let outer = font_size / GLOW_DIVISOR;
        let layer = |blur_radius: f64| GlowLayer {
            blur_radius,
            color: color.clone(),
        };

        FrameDescription {
            text: text.to_string(),
            position: motion.position,
            font_size,
            extent,
            background: Color::Named(NamedColor::Black),
            layers: [layer(outer), layer(outer / 2.0), layer(0.0)],
        }
    }
}
