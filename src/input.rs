//! Text-entry line for the chat input box

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means to the input box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Plain Enter: send the buffer
    Submit,
    /// Enter with a modifier: literal line break
    Newline,
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Not an editing key
    Ignore,
}

/// Map a key event to an editing action
pub fn classify(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Enter if key.modifiers.is_empty() => InputAction::Submit,
        KeyCode::Enter => InputAction::Newline,
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            InputAction::Insert(c)
        }
        KeyCode::Backspace => InputAction::Backspace,
        KeyCode::Delete => InputAction::Delete,
        KeyCode::Left => InputAction::Left,
        KeyCode::Right => InputAction::Right,
        KeyCode::Home => InputAction::Home,
        KeyCode::End => InputAction::End,
        _ => InputAction::Ignore,
    }
}

/// Editable buffer with a cursor measured in chars
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    buffer: String,
    cursor: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Apply an editing action. Returns `false` for actions the line does not
    /// handle (`Submit`, `Ignore`).
    pub fn apply(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Insert(c) => self.insert(c),
            InputAction::Newline => self.insert('\n'),
            InputAction::Backspace => self.backspace(),
            InputAction::Delete => self.delete(),
            InputAction::Left => self.cursor = self.cursor.saturating_sub(1),
            InputAction::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            InputAction::Home => self.cursor = 0,
            InputAction::End => self.cursor = self.char_len(),
            InputAction::Submit | InputAction::Ignore => return false,
        }
        true
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Take the buffer contents, leaving the line empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }
}
