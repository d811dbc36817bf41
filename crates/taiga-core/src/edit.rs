use serde::{Deserialize, Serialize};

use crate::Span;

/// A textual edit described by a span replacement.
///
/// The engine never applies edits itself; it returns them for the host to
/// apply inside its own document transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(Span::new(offset, offset), text)
    }

    pub fn delete(span: Span) -> Self {
        Self::new(span, String::new())
    }

    /// Apply this edit to `text`, returning `None` when the span is out of
    /// bounds or not on UTF-8 boundaries.
    pub fn apply(&self, text: &str) -> Option<String> {
        let head = text.get(..self.span.start)?;
        let tail = text.get(self.span.end.max(self.span.start)..)?;
        let mut out = String::with_capacity(head.len() + self.new_text.len() + tail.len());
        out.push_str(head);
        out.push_str(&self.new_text);
        out.push_str(tail);
        Some(out)
    }
}
