use crate::types::Color;

/// The colours cycled through on every bounce.
pub const DEFAULT_COLORS: [&str; 8] = [
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF", "#FFA500", "#FF69B4",
];

/// Fixed, non-empty, cyclic sequence of colours with a cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    current: usize,
}

impl Palette {
    /// Returns `None` for an empty colour list.
    pub fn new(colors: Vec<Color>) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }
        Some(Self { colors, current: 0 })
    }

    pub fn advance_if_bounced(&mut self, bounced: bool) {
        if bounced {
            self.current = (self.current + 1) % self.colors.len();
        }
    }

    pub fn current(&self) -> &Color {
        &self.colors[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

impl Default for Palette {
    fn default() -> Self {
        let colors = DEFAULT_COLORS
            .iter()
            .filter_map(|hex| Color::from_hex(hex))
            .collect();
        Self { colors, current: 0 }
    }
}
