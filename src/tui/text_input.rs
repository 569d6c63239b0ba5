use crossterm::event::KeyCode;

/// Cursor state for an editable text field.
///
/// The text itself lives in the component's state; this only tracks where
/// the cursor is, so the same value can also be set programmatically.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    cursor_pos: usize, // Character index (0 = before first char)
    multiline: bool,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field where Enter inserts a line break
    pub fn multiline() -> Self {
        Self {
            cursor_pos: 0,
            multiline: true,
        }
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn reset(&mut self) {
        self.cursor_pos = 0;
    }

    /// Keep the cursor inside `text` after the value changed underneath it
    pub fn clamp_to(&mut self, text: &str) {
        self.cursor_pos = self.cursor_pos.min(text.chars().count());
    }

    /// Handle a key press against the current value.
    /// Returns Some(new_value) if the text changed, None if only the cursor moved
    /// or the key is not an editing key.
    pub fn handle_key(&mut self, key: KeyCode, current_value: &str) -> Option<String> {
        let char_count = current_value.chars().count();
        self.cursor_pos = self.cursor_pos.min(char_count);

        match key {
            KeyCode::Char(c) => Some(self.insert(current_value, c)),
            KeyCode::Enter if self.multiline => Some(self.insert(current_value, '\n')),
            KeyCode::Backspace if self.cursor_pos > 0 => {
                let mut chars: Vec<char> = current_value.chars().collect();
                chars.remove(self.cursor_pos - 1);
                self.cursor_pos -= 1;
                Some(chars.into_iter().collect())
            }
            KeyCode::Delete if self.cursor_pos < char_count => {
                let mut chars: Vec<char> = current_value.chars().collect();
                chars.remove(self.cursor_pos);
                Some(chars.into_iter().collect())
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                if self.cursor_pos < char_count {
                    self.cursor_pos += 1;
                }
                None
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                None
            }
            KeyCode::End => {
                self.cursor_pos = char_count;
                None
            }
            _ => None,
        }
    }

    fn insert(&mut self, current_value: &str, c: char) -> String {
        let mut chars: Vec<char> = current_value.chars().collect();
        chars.insert(self.cursor_pos, c);
        self.cursor_pos += 1;
        chars.into_iter().collect()
    }

    /// The value with a cursor marker spliced in, for rendering
    pub fn with_cursor(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let pos = self.cursor_pos.min(chars.len());
        chars.insert(pos, '│');
        chars.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(state: &mut TextInputState, value: &mut String, text: &str) {
        for c in text.chars() {
            if let Some(next) = state.handle_key(KeyCode::Char(c), value) {
                *value = next;
            }
        }
    }

    #[test]
    fn typing_and_editing() {
        let mut state = TextInputState::new();
        let mut value = String::new();
        type_str(&mut state, &mut value, "helo");

        state.handle_key(KeyCode::Left, &value);
        value = state.handle_key(KeyCode::Char('l'), &value).unwrap();
        assert_eq!(value, "hello");

        state.handle_key(KeyCode::Home, &value);
        assert_eq!(state.handle_key(KeyCode::Backspace, &value), None);
        value = state.handle_key(KeyCode::Delete, &value).unwrap();
        assert_eq!(value, "ello");
    }

    #[test]
    fn enter_only_breaks_lines_when_multiline() {
        let mut single = TextInputState::new();
        assert_eq!(single.handle_key(KeyCode::Enter, "a"), None);

        let mut multi = TextInputState::multiline();
        multi.handle_key(KeyCode::End, "a");
        assert_eq!(multi.handle_key(KeyCode::Enter, "a").as_deref(), Some("a\n"));
    }

    #[test]
    fn handles_multibyte_text() {
        let mut state = TextInputState::new();
        let mut value = String::new();
        type_str(&mut state, &mut value, "héllo wörld");
        value = state.handle_key(KeyCode::Backspace, &value).unwrap();
        assert_eq!(value, "héllo wörl");
        assert_eq!(state.with_cursor("hé"), "hé│");
    }
}
