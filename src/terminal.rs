//! Terminal playback of pre-rendered frames

use crate::frame::Frame;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::Print,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::time::{Duration, Instant};

/// Alternate-screen display that draws one frame per call
pub struct TerminalDisplay {
    width: u16,
    height: u16,
    buffer: BufWriter<Stdout>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        // Size is read after switching screens so it reflects the alternate buffer
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::Clear(ClearType::All))?;

        let (width, height) = terminal::size()?;

        Ok(Self {
            width,
            height: height.saturating_sub(1), // status line
            buffer: BufWriter::new(stdout),
        })
    }

    /// Columns and rows of `frame` that fit above the status line
    pub fn visible(&self, frame: &Frame) -> (usize, usize) {
        (
            frame.width().min(self.width as usize),
            frame.height().min(self.height as usize),
        )
    }

    /// Draw the visible part of `frame` and the status line under it
    pub fn draw(&mut self, frame: &Frame, status: &str) -> io::Result<()> {
        let (cols, rows) = self.visible(frame);
        queue!(self.buffer, cursor::Hide)?;

        // Rows are clipped here, never wrapped by the terminal
        for y in 0..rows {
            let start = y * frame.width();
            let line: String = frame.cells()[start..start + cols].iter().collect();
            queue!(
                self.buffer,
                cursor::MoveTo(0, y as u16),
                Print(line),
                terminal::Clear(ClearType::UntilNewLine)
            )?;
        }

        queue!(
            self.buffer,
            cursor::MoveTo(0, rows as u16),
            terminal::Clear(ClearType::FromCursorDown),
            Print(status),
            cursor::Show
        )?;
        self.buffer.flush()
    }

    /// Check for keyboard input
    pub fn poll_input(&self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                return Ok(Some(key_event));
            }
        }
        Ok(None)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = self.buffer.flush();
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

/// Key actions during playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    Quit,
    Pause,
}

pub fn parse_key_event(event: KeyEvent) -> Action {
    match event.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') => Action::Pause,
        _ => Action::None,
    }
}

/// Looping cursor over a frame sequence
#[derive(Debug)]
pub struct Playback<'a> {
    frames: &'a [Frame],
    index: usize,
    paused: bool,
}

impl<'a> Playback<'a> {
    pub fn new(frames: &'a [Frame]) -> Self {
        Self {
            frames,
            index: 0,
            paused: false,
        }
    }

    pub fn current(&self) -> Option<&'a Frame> {
        self.frames.get(self.index)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Apply a key action. Returns false once playback should stop.
    pub fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Pause => self.paused = !self.paused,
            Action::None => {}
        }
        true
    }

    /// Step to the next frame, wrapping after the last
    pub fn advance(&mut self) {
        if !self.frames.is_empty() {
            self.index = (self.index + 1) % self.frames.len();
        }
    }

    pub fn status(&self, clipped: bool) -> String {
        let mut status = format!(
            "Frame {}/{} | [SPACE] Pause  [Q]uit",
            self.index + 1,
            self.frames.len()
        );
        if clipped {
            status.push_str(" | terminal smaller than frame");
        }
        status
    }
}

/// Loop the frames in the alternate screen until the user quits
pub fn play(frames: &[Frame], delay: Duration) -> io::Result<()> {
    let mut playback = Playback::new(frames);
    if playback.current().is_none() {
        return Ok(());
    }

    let mut display = TerminalDisplay::new()?;
    let mut last_frame: Option<Instant> = None;

    loop {
        if let Some(key_event) = display.poll_input(Duration::from_millis(10))? {
            if !playback.handle(parse_key_event(key_event)) {
                break;
            }
        }

        if playback.is_paused() || last_frame.is_some_and(|t| t.elapsed() < delay) {
            continue;
        }
        last_frame = Some(Instant::now());

        let Some(frame) = playback.current() else {
            break;
        };
        let clipped = display.visible(frame) != (frame.width(), frame.height());
        if let Err(e) = display.draw(frame, &playback.status(clipped)) {
            if e.kind() == io::ErrorKind::BrokenPipe {
                break;
            }
            return Err(e);
        }
        playback.advance();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn frames(count: usize) -> Vec<Frame> {
        (0..count).map(|_| Frame::from_cells(2, 1, vec!['@', ' '])).collect()
    }

    #[test]
    fn test_parse_key_event_quit() {
        let event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::Quit);
    }

    #[test]
    fn test_parse_key_event_escape() {
        let event = KeyEvent::new(KeyCode::Esc, KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::Quit);
    }

    #[test]
    fn test_parse_key_event_pause() {
        let event = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::Pause);
    }

    #[test]
    fn test_parse_key_event_none() {
        let event = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::None);
    }

    #[test]
    fn test_playback_wraps() {
        let frames = frames(3);
        let mut playback = Playback::new(&frames);
        for _ in 0..3 {
            playback.advance();
        }
        assert_eq!(playback.status(false), "Frame 1/3 | [SPACE] Pause  [Q]uit");
    }

    #[test]
    fn test_playback_keys() {
        let frames = frames(2);
        let mut playback = Playback::new(&frames);
        assert!(playback.handle(Action::Pause));
        assert!(playback.is_paused());
        assert!(playback.handle(Action::None));
        assert!(playback.is_paused());
        assert!(playback.handle(Action::Pause));
        assert!(!playback.is_paused());
        assert!(!playback.handle(Action::Quit));
    }

    #[test]
    fn test_status_notes_clipping() {
        let frames = frames(2);
        let mut playback = Playback::new(&frames);
        playback.advance();
        assert_eq!(
            playback.status(true),
            "Frame 2/2 | [SPACE] Pause  [Q]uit | terminal smaller than frame"
        );
    }

    #[test]
    fn test_play_nothing() {
        let mut playback = Playback::new(&[]);
        playback.advance();
        assert!(playback.current().is_none());
        assert!(play(&[], Duration::from_millis(1)).is_ok());
    }
}
