use std::{io::{stdout, Stdout, Write}, time::Duration};

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

/// Character-grid position on the terminal, column first.
pub type ScreenPos = (u16, u16);

/// Thin wrapper over the crossterm surface: queued single-cell writes, a
/// saved-screen overlay for centered messages, and key event draining.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<char>,
    overlay: Option<Overlay>,
}

/// Region currently covered by a centered message, so the cells underneath
/// can be restored when it is dismissed.
struct Overlay {
    top_left: ScreenPos,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new() -> Self {
        let (width, height) = terminal::size().expect("Error reading size.");
        let screen = vec![' '; width as usize * height as usize];
        TermManager { width, height, stdout: stdout(), screen, overlay: None }
    }

    pub fn setup(&mut self) {
        execute!(self.stdout, EnterAlternateScreen).expect("Error entering alt screen");
        terminal::enable_raw_mode().expect("Error setting raw mode.");
        execute!(self.stdout, cursor::Hide).expect("Error hiding cursor.");
    }

    pub fn restore(&mut self) {
        execute!(self.stdout, cursor::Show).expect("Error showing cursor.");
        terminal::disable_raw_mode().expect("Error unsetting raw mode.");
        execute!(self.stdout, LeaveAlternateScreen).expect("Error leaving alt screen");
    }

    /// Headless surface for rendering tests; writes still queue to stdout
    /// but nothing is ever executed against a real terminal.
    #[cfg(test)]
    pub fn with_size(width: u16, height: u16) -> Self {
        let screen = vec![' '; width as usize * height as usize];
        TermManager { width, height, stdout: stdout(), screen, overlay: None }
    }

    #[cfg(test)]
    pub fn char_at(&self, pos: ScreenPos) -> char {
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize]
    }

    pub fn size(&self) -> ScreenPos {
        (self.width, self.height)
    }

    pub fn read_key_blocking(&self) -> KeyEvent {
        loop {
            if let Event::Key(ev) = read().unwrap() {
                return ev;
            }
        }
    }

    /// Drains every key event queued since the last call, without blocking.
    pub fn read_key_events_queue(&self) -> Vec<KeyEvent> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).unwrap() {
            if let Event::Key(ev) = read().unwrap() {
                events.push(ev);
            }
        }

        events
    }

    /// Draws a box from the origin enclosing a `width` x `height` interior.
    pub fn draw_borders(&mut self, width: u16, height: u16) {
        let end_x = width + 1;
        let end_y = height + 1;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, 0), ch);
            self.print_at((x, end_y), ch);
        }

        for y in 1..=height {
            self.print_at((0, y), '|');
            self.print_at((end_x, y), '|');
        }

        self.flush();
    }

    pub fn print_at(&mut self, pos: ScreenPos, ch: char) {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).unwrap();
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
    }

    pub fn print_at_colored(&mut self, pos: ScreenPos, ch: char, color: Color) {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetForegroundColor(color),
            style::Print(ch),
            ResetColor
        )
        .unwrap();
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
    }

    /// Writes a text row starting at `pos`, padding with spaces up to
    /// `min_len` to overwrite whatever a longer previous row left behind.
    pub fn print_text(&mut self, pos: ScreenPos, text: &str, min_len: usize) {
        let mut x = pos.0;
        for ch in text.chars().chain(std::iter::repeat(' ')).take(text.chars().count().max(min_len)) {
            self.print_at((x, pos.1), ch);
            x += 1;
        }
    }

    /// Shows a centered boxed message over the board. The covered cells are
    /// remembered and restored by `hide_message`.
    pub fn show_message(&mut self, lines: &[&str]) {
        if self.overlay.is_some() {
            self.hide_message();
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap() + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);

        // Blank top and bottom rows of the box
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{: ^width$}", line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch);
            }
        }

        self.overlay = Some(Overlay { top_left, width: msg_width, height: msg_height });
        self.flush();
    }

    pub fn hide_message(&mut self) {
        let overlay = match self.overlay.take() {
            Some(o) => o,
            None => return,
        };

        // Restore the content from the screen buffer
        for y_diff in 0..overlay.height {
            for x_diff in 0..overlay.width {
                let (x, y) = (overlay.top_left.0 + x_diff, overlay.top_left.1 + y_diff);
                let ch = self.screen[self.width as usize * y as usize + x as usize];
                self.print_at_no_save((x, y), ch);
            }
        }

        self.flush();
    }

    pub fn clear(&mut self) {
        execute!(self.stdout, terminal::Clear(ClearType::All)).expect("Error clearing.");
        self.screen = vec![' '; self.width as usize * self.height as usize];
    }

    pub fn flush(&mut self) {
        self.stdout.flush().expect("Error flushing.");
    }

    ///////////////////////////////////////////////////////////////////////////

    // Message cells bypass the screen buffer so hide_message can put the
    // board content back afterwards.
    fn print_at_no_save(&mut self, pos: ScreenPos, ch: char) {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).unwrap();
    }
}
