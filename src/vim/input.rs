use zeroize::Zeroize;

/// Single-line edit buffer with a char-indexed cursor. Masked buffers hold
/// secrets and wipe their memory when cleared, replaced or dropped.
#[derive(Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
    masked: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn masked() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            masked: true,
        }
    }

    pub fn with_content(value: &str, masked: bool) -> Self {
        let mut buffer = Self {
            content: String::new(),
            cursor: 0,
            masked,
        };
        buffer.set(value);
        buffer
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn display(&self, mask_char: char) -> String {
        if self.masked {
            std::iter::repeat_n(mask_char, self.len()).collect()
        } else {
            self.content.clone()
        }
    }

    /// Display text split around the cursor
    pub fn split_at_cursor(&self, mask_char: char) -> (String, String) {
        let shown = self.display(mask_char);
        let before = shown.chars().take(self.cursor).collect();
        let after = shown.chars().skip(self.cursor).collect();
        (before, after)
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = self.byte_at(self.cursor);
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.remove_at_cursor();
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.content.zeroize();
        self.cursor = 0;
    }

    pub fn set(&mut self, value: &str) {
        self.content.zeroize();
        self.content.push_str(value);
        self.cursor = self.len();
    }

    fn remove_at_cursor(&mut self) {
        let start = self.byte_at(self.cursor);
        let end = self.byte_at(self.cursor + 1);
        self.content.replace_range(start..end, "");
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

impl Drop for InputBuffer {
    fn drop(&mut self) {
        if self.masked {
            self.content.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text_at_cursor() {
        let mut buffer = InputBuffer::with_content("/mnt/müsic", false);
        buffer.move_left();
        buffer.move_left();
        buffer.delete_back();
        assert_eq!(buffer.content(), "/mnt/müic");
        buffer.insert('s');
        assert_eq!(buffer.content(), "/mnt/müsic");
        buffer.move_end();
        assert!(!buffer.delete_forward());
        buffer.move_start();
        assert!(!buffer.delete_back());
        assert!(buffer.delete_forward());
        assert_eq!(buffer.content(), "mnt/müsic");
    }

    #[test]
    fn masked_buffer_hides_content() {
        let buffer = InputBuffer::with_content("hunter2", true);
        assert_eq!(buffer.display('*'), "*******");
        let (before, after) = buffer.split_at_cursor('*');
        assert_eq!(before.len(), 7);
        assert!(after.is_empty());
    }

    #[test]
    fn set_replaces_and_moves_cursor_to_end() {
        let mut buffer = InputBuffer::new();
        buffer.set("media.lan");
        assert_eq!(buffer.cursor(), 9);
        buffer.set("a");
        assert_eq!(buffer.content(), "a");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn masked_constructor_starts_empty() {
        let mut buffer = InputBuffer::masked();
        assert!(buffer.is_masked());
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
        buffer.insert('x');
        assert_eq!(buffer.display('*'), "*");
    }
}
