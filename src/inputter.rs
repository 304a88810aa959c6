use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};
use tracing::trace;

/// Single line prompt. Only characters accepted by `accept` are inserted.
pub struct Inputter {
    current_input: String,
    cursor_pos: usize,
    max_len: usize,
    accept: fn(char) -> bool,
    finished: bool,
    canceled: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub canceled: bool,
    pub cursor_pos: usize,
}

impl Default for Inputter {
    fn default() -> Self {
        Inputter::new(usize::MAX, |_| true)
    }
}

impl Inputter {
    pub fn new(max_len: usize, accept: fn(char) -> bool) -> Self {
        Self {
            current_input: String::new(),
            cursor_pos: 0,
            max_len,
            accept,
            finished: false,
            canceled: false,
        }
    }

    /// Prompt for a page number.
    pub fn numeric(max_len: usize) -> Self {
        Inputter::new(max_len, |c| c.is_ascii_digit())
    }

    pub fn read(&mut self, key: event::KeyEvent) -> InputResult {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.enter(),
            (KeyCode::Esc, _) => self.escape(),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.left(),
            (KeyCode::Right, _) => self.right(),
            (KeyCode::Home, _) => {
                self.cursor_pos = 0;
                self.get()
            }
            (KeyCode::End, _) => {
                self.cursor_pos = self.char_count();
                self.get()
            }
            (kc, km) => self.key(kc, km),
        }
    }

    pub fn get(&self) -> InputResult {
        InputResult {
            canceled: self.canceled,
            finished: self.finished,
            input: self.current_input.clone(),
            cursor_pos: self.cursor_pos,
        }
    }

    pub fn clear(&mut self) {
        self.canceled = false;
        self.finished = false;
        self.current_input.clear();
        self.cursor_pos = 0;
    }

    fn enter(&mut self) -> InputResult {
        self.finished = true;
        self.get()
    }

    fn escape(&mut self) -> InputResult {
        self.clear();
        self.canceled = true;
        self.finished = true;
        self.get()
    }

    fn backspace(&mut self) -> InputResult {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let idx = self.byte_pos(self.cursor_pos);
            self.current_input.remove(idx);
        }
        self.get()
    }

    fn delete(&mut self) -> InputResult {
        if self.cursor_pos < self.char_count() {
            let idx = self.byte_pos(self.cursor_pos);
            self.current_input.remove(idx);
        }
        self.get()
    }

    fn left(&mut self) -> InputResult {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
        self.get()
    }

    fn right(&mut self) -> InputResult {
        if self.cursor_pos < self.char_count() {
            self.cursor_pos += 1;
        }
        self.get()
    }

    fn key(&mut self, code: KeyCode, modifier: KeyModifiers) -> InputResult {
        if modifier.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return self.get();
        }
        match code.as_char() {
            Some(chr) if (self.accept)(chr) && self.char_count() < self.max_len => {
                let idx = self.byte_pos(self.cursor_pos);
                self.current_input.insert(idx, chr);
                self.cursor_pos += 1;
            }
            Some(chr) => trace!("Rejected input {chr:?}"),
            None => {}
        }
        self.get()
    }

    fn char_count(&self) -> usize {
        self.current_input.chars().count()
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.current_input
            .char_indices()
            .nth(char_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}
