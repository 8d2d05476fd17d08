use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::engine::Palette;
use crate::engine::palette::DEFAULT_COLORS;
use crate::renderer::measure::CellMetrics;
use crate::types::Color;

/// Smallest accepted cell dimension, in pixels.
const MIN_CELL_PX: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fps: u32,
    pub cell: CellMetrics,
    /// `#RRGGBB` strings, cycled on every bounce.
    pub palette: Vec<String>,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_restart")]
    pub restart: String,
    #[serde(default = "default_fullscreen")]
    pub fullscreen: String,
}

fn default_quit() -> String { "q".into() }
fn default_restart() -> String { "r".into() }
fn default_fullscreen() -> String { "F11".into() }

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            quit: default_quit(),
            restart: default_restart(),
            fullscreen: default_fullscreen(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fps: 60,
            cell: CellMetrics::default(),
            palette: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Load the user config, falling back to defaults when it is missing or
    /// invalid.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: invalid config ({e:#}), using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Clamp fps and reject cell sizes small enough to blow up glow radii
    /// (measured in cells).
    pub fn validate(&mut self) -> Result<()> {
        self.fps = self.fps.max(1);
        let cell = self.cell;
        if !(cell.width_px >= MIN_CELL_PX && cell.height_px >= MIN_CELL_PX) {
            bail!(
                "cell size must be at least {MIN_CELL_PX}px, got {}x{}",
                cell.width_px,
                cell.height_px
            );
        }
        Ok(())
    }

    /// Build the bounce palette from the configured hex strings.
    pub fn palette(&self) -> Result<Palette> {
        let colors = self
            .palette
            .iter()
            .map(|hex| Color::from_hex(hex).ok_or_else(|| anyhow!("invalid palette colour {hex:?}")))
            .collect::<Result<Vec<_>>>()?;
        Palette::new(colors).context("palette must contain at least one colour")
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("vendor-bounce");
        path.push("config.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    let (required, key) = if let Some(rest) = binding.strip_prefix("Ctrl-") {
        (KeyModifiers::CONTROL, rest)
    } else if let Some(rest) = binding.strip_prefix("Alt-") {
        (KeyModifiers::ALT, rest)
    } else {
        (KeyModifiers::NONE, binding)
    };

    // Plain bindings like "r" must not fire on Ctrl-r or Alt-r.
    let held = event.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
    if held != required {
        return false;
    }

    match key {
        "Enter" => event.code == KeyCode::Enter,
        "Esc" => event.code == KeyCode::Esc,
        "Space" => event.code == KeyCode::Char(' '),
        "Tab" => event.code == KeyCode::Tab,
        "Backspace" => event.code == KeyCode::Backspace,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return event.code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => event.code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}
