/// Append-and-backspace text buffer for the verification note forms.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    content: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn insert_char(&mut self, ch: char) {
        self.content.push(ch);
    }

    pub fn backspace(&mut self) -> bool {
        self.content.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Trimmed content, clearing the buffer.
    pub fn take(&mut self) -> String {
        let content = self.content.trim().to_string();
        self.content.clear();
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn editing_round_trip() {
        let mut buffer = InputBuffer::new();
        for ch in "done ✓!".chars() {
            buffer.insert_char(ch);
        }
        assert!(buffer.backspace());
        assert_eq!(buffer.content(), "done ✓");

        assert_eq!(buffer.take(), "done ✓");
        assert!(buffer.is_empty());
        assert!(!buffer.backspace());
    }
}
