//! Player — the terminal host.
//!
//! Owns the real frame clock, forwards terminal resizes and key presses to
//! the controller, and paints the renderer's cell frames. It makes no motion
//! or colour decisions of its own.

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Result, bail};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::{cursor, execute, queue, style, terminal};
use tracing::info;

use crate::config::{Config, KeyBindings, matches_binding};
use crate::controller::ScreensaverController;
use crate::controller::random::SeededRandom;
use crate::controller::scheduler::FrameClock;
use crate::engine::Palette;
use crate::menubar::print_key_hints;
use crate::renderer::Renderer;
use crate::renderer::measure::BitmapMeasure;
use crate::types::{Cell, Color, Frame, NamedColor, Style};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Rows reserved below the canvas for the status bar.
const STATUS_ROWS: u16 = 1;

pub struct Player {
    controller: ScreensaverController<FrameClock, SeededRandom>,
    renderer: Renderer,
    bindings: KeyBindings,
    text: String,
    cols: u16,
    rows: u16,
    fullscreen: bool,
}

enum KeyOutcome {
    Continue,
    Quit,
}

impl Player {
    pub fn new(text: String, config: &Config, palette: Palette) -> Self {
        let controller = ScreensaverController::new(
            Default::default(),
            palette,
            FrameClock::new(config.fps),
            SeededRandom::from_entropy(),
        );
        Self {
            controller,
            renderer: Renderer::new(config.cell),
            bindings: config.key_bindings.clone(),
            text,
            cols: 0,
            rows: 0,
            fullscreen: false,
        }
    }

    /// Run the screensaver in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_h < CANVAS_OFFSET + STATUS_ROWS + 1 || term_w == 0 {
            bail!("Terminal too small: need at least 1x3, have {term_w}x{term_h}");
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout, term_w, term_h);

        // Always restore terminal state.
        self.controller.stop();
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout, term_w: u16, term_h: u16) -> Result<()> {
        self.resize(term_w, term_h);
        self.controller.start(self.text.clone());
        info!(text = %self.text, cols = term_w, rows = term_h, "player started");
        self.render_menubar(stdout)?;

        loop {
            let wait = self.controller.scheduler().time_until_due(Instant::now());
            if event::poll(wait)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let KeyOutcome::Quit = self.handle_key(stdout, key)? {
                            break;
                        }
                    }
                    Event::Resize(w, h) => {
                        self.resize(w, h);
                        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                        self.render_menubar(stdout)?;
                    }
                    _ => {}
                }
            }

            let Some(token) = self.controller.scheduler_mut().take_due(Instant::now()) else {
                continue;
            };
            if let Some(frame) = self.controller.on_frame(token, &BitmapMeasure) {
                let rows = self.canvas_rows();
                let cells = self.renderer.render(&frame, self.cols, rows);
                self.render_frame(stdout, &cells)?;
                self.render_status(stdout)?;
            }
        }

        info!(frames = self.controller.frame_count(), "player finished");
        Ok(())
    }

    fn handle_key(&mut self, stdout: &mut io::Stdout, key: KeyEvent) -> Result<KeyOutcome> {
        if key.code == event::KeyCode::Esc || matches_binding(&self.bindings.quit, &key) {
            return Ok(KeyOutcome::Quit);
        }
        if matches_binding(&self.bindings.restart, &key) {
            self.controller.start(self.text.clone());
        } else if matches_binding(&self.bindings.fullscreen, &key) {
            self.fullscreen = !self.fullscreen;
            if self.fullscreen {
                stdout.write_all(b"\x1b[10;1t")?;
            } else {
                stdout.write_all(b"\x1b[10;0t")?;
            }
            stdout.flush()?;
        }
        Ok(KeyOutcome::Continue)
    }

    /// Track the new terminal size and push the canvas viewport, in pixels,
    /// to the controller. The next frame is repainted in full.
    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let metrics = self.renderer.metrics();
        let canvas_rows = self.canvas_rows();
        self.controller.on_resize(
            cols as f64 * metrics.width_px,
            canvas_rows as f64 * metrics.height_px,
        );
        self.renderer.invalidate();
    }

    fn canvas_rows(&self) -> u16 {
        self.rows.saturating_sub(CANVAS_OFFSET + STATUS_ROWS)
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let b = &self.bindings;
        let hints = [
            format!("[{}][Esc] quit", b.quit),
            format!("[{}] restart", b.restart),
            format!("[{}] full", b.fullscreen),
        ];

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
        )?;
        print_key_hints(stdout, &hints)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_frame(&self, stdout: &mut io::Stdout, frame: &Frame) -> Result<()> {
        match frame {
            Frame::Full { cells } => {
                for (y, row) in cells.iter().enumerate() {
                    queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
                    for cell in row {
                        print_cell(stdout, cell)?;
                    }
                }
            }
            Frame::Diff { changes } => {
                for change in changes {
                    queue!(stdout, cursor::MoveTo(change.x, change.y + CANVAS_OFFSET))?;
                    print_cell(stdout, &change.cell)?;
                }
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = CANVAS_OFFSET + self.canvas_rows();
        if status_y >= self.rows {
            return Ok(()); // No room for status bar.
        }

        let scaling = self.controller.scaling();
        let status = format!(
            " {} | {:.0}px x{:.2} | colour {} | bounces {} ",
            self.controller.display(),
            scaling.font_size,
            scaling.speed_multiplier,
            self.controller.palette_index() + 1,
            self.controller.bounce_count(),
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

fn print_cell(stdout: &mut io::Stdout, cell: &Cell) -> Result<()> {
    let cs = to_content_style(&cell.style);
    queue!(
        stdout,
        style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dim_rgb_style_converts() {
        let s = Style {
            fg: Some(Color::Rgb { r: 255, g: 105, b: 180 }),
            bg: Some(Color::Named(NamedColor::Black)),
            bold: false,
            dim: true,
        };
        let cs = to_content_style(&s);
        assert_eq!(
            cs.foreground_color,
            Some(style::Color::Rgb { r: 255, g: 105, b: 180 })
        );
        assert_eq!(cs.background_color, Some(style::Color::Black));
        assert!(cs.attributes.has(style::Attribute::Dim));
    }
}
