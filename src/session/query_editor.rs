use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const TAB_WIDTH: usize = 2;

/// Multi-line buffer holding the query the user is writing.
pub struct QueryEditor {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl QueryEditor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Replace the whole buffer, cursor at the end.
    pub fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// (row, column) of the cursor, both in chars.
    pub fn cursor_position(&self) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for ch in self.text.chars().take(self.cursor) {
            if ch == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    /// Apply an editing key. Returns false for keys the editor ignores.
    pub fn handle(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => self.insert_str("\n"),
            KeyCode::Tab => self.insert_str(&" ".repeat(TAB_WIDTH)),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.cursor < self.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Up => self.move_vertical(-1),
            KeyCode::Down => self.move_vertical(1),
            KeyCode::Home => self.cursor = self.line_start(),
            KeyCode::End => self.cursor = self.line_end(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.remove_char_at(self.cursor - 1);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    self.remove_char_at(self.cursor);
                }
            }
            KeyCode::Char('a') if ctrl => self.cursor = self.line_start(),
            KeyCode::Char('e') if ctrl => self.cursor = self.line_end(),
            KeyCode::Char('u') if ctrl => self.delete_to_line_start(),
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl => self.insert_str(ch.encode_utf8(&mut [0; 4])),
            _ => return false,
        }
        true
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn insert_str(&mut self, s: &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert_str(byte_offset, s);
        self.cursor += s.chars().count();
    }

    fn remove_char_at(&mut self, char_idx: usize) {
        let start = self.char_to_byte(char_idx);
        let end = self.char_to_byte(char_idx + 1);
        self.text.replace_range(start..end, "");
    }

    fn line_start(&self) -> usize {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] != '\n' {
            pos -= 1;
        }
        pos
    }

    fn line_end(&self) -> usize {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos < chars.len() && chars[pos] != '\n' {
            pos += 1;
        }
        pos
    }

    /// Move one line up or down, keeping the column where the target line
    /// is long enough.
    fn move_vertical(&mut self, delta: isize) {
        let (row, col) = self.cursor_position();
        let lines = self.lines();
        let target = row as isize + delta;
        if target < 0 || target as usize >= lines.len() {
            return;
        }
        let target = target as usize;
        let start: usize = lines[..target].iter().map(|l| l.chars().count() + 1).sum();
        self.cursor = start + col.min(lines[target].chars().count());
    }

    /// Kill from the start of the current line up to the cursor.
    fn delete_to_line_start(&mut self) {
        let start = self.line_start();
        let start_byte = self.char_to_byte(start);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
    }

    /// Delete word before cursor (unix-word-rubout: skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;

        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }

        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(editor: &mut QueryEditor, s: &str) {
        for ch in s.chars() {
            editor.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn starts_with_cursor_after_starter_code() {
        let editor = QueryEditor::new("SELECT 1;");
        assert_eq!(editor.value(), "SELECT 1;");
        assert_eq!(editor.cursor_position(), (0, 9));
    }

    #[test]
    fn enter_inserts_newline() {
        let mut editor = QueryEditor::new("SELECT *");
        editor.handle(key(KeyCode::Enter));
        type_str(&mut editor, "FROM spells;");
        assert_eq!(editor.value(), "SELECT *\nFROM spells;");
        assert_eq!(editor.lines(), vec!["SELECT *", "FROM spells;"]);
        assert_eq!(editor.cursor_position(), (1, 12));
    }

    #[test]
    fn up_down_keep_column_when_possible() {
        let mut editor = QueryEditor::new("SELECT name\nFROM x\nWHERE id = 1");
        // cursor at (2, 12)
        editor.handle(key(KeyCode::Up));
        assert_eq!(editor.cursor_position(), (1, 6));
        editor.handle(key(KeyCode::Up));
        assert_eq!(editor.cursor_position(), (0, 6));
        editor.handle(key(KeyCode::Up));
        assert_eq!(editor.cursor_position(), (0, 6));
        editor.handle(key(KeyCode::Down));
        editor.handle(key(KeyCode::Down));
        assert_eq!(editor.cursor_position(), (2, 6));
        editor.handle(key(KeyCode::Down));
        assert_eq!(editor.cursor_position(), (2, 6));
    }

    #[test]
    fn home_end_work_per_line() {
        let mut editor = QueryEditor::new("ab\ncde");
        editor.handle(key(KeyCode::Home));
        assert_eq!(editor.cursor_position(), (1, 0));
        editor.handle(key(KeyCode::Up));
        editor.handle(ctrl('e'));
        assert_eq!(editor.cursor_position(), (0, 2));
        editor.handle(ctrl('a'));
        assert_eq!(editor.cursor_position(), (0, 0));
    }

    #[test]
    fn backspace_joins_lines_and_stops_at_start() {
        let mut editor = QueryEditor::new("a\nb");
        editor.handle(key(KeyCode::Backspace));
        editor.handle(key(KeyCode::Backspace));
        assert_eq!(editor.value(), "a");
        editor.handle(key(KeyCode::Backspace));
        editor.handle(key(KeyCode::Backspace));
        assert_eq!(editor.value(), "");
        assert_eq!(editor.cursor_position(), (0, 0));
    }

    #[test]
    fn delete_at_boundaries() {
        let mut editor = QueryEditor::new("ab");
        editor.handle(key(KeyCode::Home));
        editor.handle(key(KeyCode::Delete));
        assert_eq!(editor.value(), "b");
        editor.handle(key(KeyCode::End));
        editor.handle(key(KeyCode::Delete));
        assert_eq!(editor.value(), "b");
    }

    #[test]
    fn multibyte_text_edits_cleanly() {
        let mut editor = QueryEditor::new("SELECT '✨'");
        editor.handle(key(KeyCode::Left));
        editor.handle(key(KeyCode::Backspace));
        assert_eq!(editor.value(), "SELECT ''");
    }

    #[test]
    fn ctrl_w_and_ctrl_u() {
        let mut editor = QueryEditor::new("SELECT name  ");
        editor.handle(ctrl('w'));
        assert_eq!(editor.value(), "SELECT ");
        editor.handle(ctrl('u'));
        assert_eq!(editor.value(), "");
    }

    #[test]
    fn ctrl_u_only_kills_the_current_line() {
        let mut editor = QueryEditor::new("SELECT name\nFROM creatures");
        editor.handle(key(KeyCode::Left));
        editor.handle(key(KeyCode::Left));
        editor.handle(ctrl('u'));
        assert_eq!(editor.value(), "SELECT name\nes");
        assert_eq!(editor.cursor_position(), (1, 0));

        editor.handle(ctrl('u'));
        assert_eq!(editor.value(), "SELECT name\nes");
    }

    #[test]
    fn tab_inserts_spaces() {
        let mut editor = QueryEditor::new("");
        editor.handle(key(KeyCode::Tab));
        assert_eq!(editor.value(), "  ");
    }

    #[test]
    fn unhandled_keys_report_false() {
        let mut editor = QueryEditor::new("x");
        assert!(!editor.handle(key(KeyCode::F(5))));
        assert!(!editor.handle(ctrl('r')));
        assert_eq!(editor.value(), "x");
    }

    #[test]
    fn set_value_moves_cursor_to_end() {
        let mut editor = QueryEditor::new("");
        editor.set_value("SELECT 1;\n");
        assert_eq!(editor.cursor_position(), (1, 0));
    }
}
