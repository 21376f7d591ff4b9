use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    style::ResetColor,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Stdout, Write, stdout};
use std::time::{Duration, Instant};

use crate::game::{Input, Key};
use crate::surface::PixelBuf;

/// How long a key counts as held after its last press or repeat when the
/// terminal never reports releases.
pub const HOLD_WINDOW: Duration = Duration::from_millis(250);

/// Owns the terminal for the lifetime of the game and restores it on drop.
pub struct Session {
    out: Stdout,
    enhanced: bool,
    scale: usize,
}

impl Session {
    pub fn start(buf: &PixelBuf) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;

        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let (cols, rows) = terminal::size()?;
        let scale = buf.fit_scale(cols, rows);
        tracing::info!(cols, rows, scale, enhanced, "terminal session started");
        Ok(Self {
            out,
            enhanced,
            scale,
        })
    }

    /// Whether the terminal reports key releases.
    pub fn reports_releases(&self) -> bool {
        self.enhanced
    }

    pub fn resize(&mut self, buf: &PixelBuf, cols: u16, rows: u16) -> io::Result<()> {
        self.scale = buf.fit_scale(cols, rows);
        tracing::debug!(cols, rows, scale = self.scale, "terminal resized");
        execute!(self.out, ResetColor, Clear(ClearType::All))
    }

    pub fn present(&mut self, buf: &PixelBuf) -> io::Result<()> {
        buf.render(&mut self.out, self.scale)
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::error!(error = %e, "failed to restore terminal");
        }
    }
}

/// Host events the game loop cares about besides key state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Quit,
    Resize(u16, u16),
}

/// Turns the terminal's press/repeat/release stream into held-key state.
#[derive(Debug)]
pub struct KeyTracker {
    left: Option<Instant>,
    right: Option<Instant>,
    up: Option<Instant>,
    hold: Duration,
    now: Instant,
}

impl KeyTracker {
    pub fn new(hold: Duration) -> Self {
        Self {
            left: None,
            right: None,
            up: None,
            hold,
            now: Instant::now(),
        }
    }

    fn slot(&mut self, key: Key) -> &mut Option<Instant> {
        match key {
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Up => &mut self.up,
        }
    }

    /// Advance the clock used to expire held keys.
    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
    }

    /// Feed one key event. Returns `Some(Signal::Quit)` for quit keys.
    pub fn handle(&mut self, ev: KeyEvent, at: Instant) -> Option<Signal> {
        let quit = matches!(ev.code, KeyCode::Char('q') | KeyCode::Esc)
            || (ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL));
        if quit && ev.kind != KeyEventKind::Release {
            return Some(Signal::Quit);
        }

        let key = match ev.code {
            KeyCode::Left | KeyCode::Char('a') => Key::Left,
            KeyCode::Right | KeyCode::Char('d') => Key::Right,
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char(' ') => Key::Up,
            _ => return None,
        };
        *self.slot(key) = match ev.kind {
            KeyEventKind::Release => None,
            KeyEventKind::Press | KeyEventKind::Repeat => Some(at),
        };
        None
    }

    /// Drain pending terminal events without blocking.
    pub fn poll(&mut self) -> io::Result<Vec<Signal>> {
        let mut signals = Vec::new();
        while event::poll(Duration::ZERO)? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) => signals.extend(self.handle(key, now)),
                Event::Resize(c, r) => signals.push(Signal::Resize(c, r)),
                _ => {}
            }
        }
        self.now = Instant::now();
        Ok(signals)
    }
}

impl Input for KeyTracker {
    fn key_down(&self, key: Key) -> bool {
        let seen = match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Up => self.up,
        };
        seen.is_some_and(|t| self.now.saturating_duration_since(t) < self.hold)
    }
}
