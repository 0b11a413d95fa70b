use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

/// An open text document tracked by the backend.
#[derive(Debug)]
pub struct Document {
    pub text: Rope,
    pub version: i32,
}

impl Document {
    pub fn new(text: &str, version: i32) -> Self {
        Document {
            text: Rope::from_str(text),
            version,
        }
    }

    /// Applies full or incremental content changes in order.
    pub fn apply(&mut self, changes: Vec<TextDocumentContentChangeEvent>, version: i32) {
        for change in changes {
            if let Some(range) = change.range {
                let start = self.offset_at(&range.start);
                let end = self.offset_at(&range.end);
                if start <= end && end <= self.text.len_chars() {
                    self.text.remove(start..end);
                    self.text.insert(start, &change.text);
                }
            } else {
                self.text = Rope::from_str(&change.text);
            }
        }
        self.version = version;
    }

    /// Converts an LSP position to a char offset, clamped to the document so
    /// out-of-range positions from the client cannot panic a request.
    pub fn offset_at(&self, position: &Position) -> usize {
        let line = (position.line as usize).min(self.text.len_lines().saturating_sub(1));
        let line_start = self.text.line_to_char(line);
        let line_len = self.text.line(line).len_chars();
        line_start + (position.character as usize).min(line_len)
    }

    /// All text from the start of the document through `position`, the window
    /// the trigger detector matches against.
    pub fn text_to(&self, position: &Position) -> String {
        let end = self.offset_at(position);
        self.text.slice(..end).to_string()
    }
}
