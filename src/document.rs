//! In-memory text buffer with a cursor.
//!
//! A [`Document`] is what the host editor hands to the format adapter. Its text is
//! only ever replaced as a whole unit of formatter output, and the cursor is carried
//! across the replacement so the user lands roughly where they were.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How formatted output is written back into a [`Document`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReplaceStrategy {
    /// Replace only the span between the common prefix and common suffix,
    /// shifting the cursor with the text around it
    #[default]
    Minimal,
    /// Replace the whole buffer and keep the cursor at its old byte offset
    Whole,
}

impl std::fmt::Display for ReplaceStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimal => write!(f, "minimal"),
            Self::Whole => write!(f, "whole"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    text: String,
    /// Byte offset, always `<= text.len()` and on a char boundary
    cursor: usize,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
        }
    }

    /// Create a document with the cursor at `cursor`, clamped into the text.
    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        let mut doc = Self::new(text);
        doc.set_cursor(cursor);
        doc
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor. Offsets past the end land on the end; offsets inside a
    /// multi-byte character land on the start of that character.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = floor_char_boundary(&self.text, offset);
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the document content with `new_text` and restore the cursor.
    ///
    /// Returns `true` if the content changed. After this call `self.text() == new_text`
    /// regardless of the strategy; the strategy only decides how much of the buffer is
    /// rewritten and where the cursor ends up.
    pub fn replace(&mut self, new_text: &str, strategy: ReplaceStrategy) -> bool {
        if self.text == new_text {
            return false;
        }

        match strategy {
            ReplaceStrategy::Whole => {
                let old_cursor = self.cursor;
                self.text.clear();
                self.text.push_str(new_text);
                self.set_cursor(old_cursor);
            }
            ReplaceStrategy::Minimal => {
                let edit = minimal_edit(&self.text, new_text);
                let cursor = shift_cursor(self.cursor, &edit, self.text.len(), new_text.len());
                self.text
                    .replace_range(edit.old.clone(), &new_text[edit.new.clone()]);
                self.set_cursor(cursor);
            }
        }

        log::debug!(
            "Replaced document content ({strategy} strategy), cursor now at {}",
            self.cursor
        );
        true
    }
}

/// The single changed span between two texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimalEdit {
    /// Span in the old text that gets replaced
    pub old: Range<usize>,
    /// Span in the new text that replaces it
    pub new: Range<usize>,
}

/// Compute the span that differs between `old` and `new`, trimming the longest common
/// prefix and then the longest common suffix that does not overlap it.
///
/// Both ranges start and end on char boundaries of their respective strings.
pub fn minimal_edit(old: &str, new: &str) -> MinimalEdit {
    let (ob, nb) = (old.as_bytes(), new.as_bytes());

    let mut prefix = ob.iter().zip(nb).take_while(|(a, b)| a == b).count();
    while !(old.is_char_boundary(prefix) && new.is_char_boundary(prefix)) {
        prefix -= 1;
    }

    let max_suffix = old.len().min(new.len()) - prefix;
    let mut suffix = ob
        .iter()
        .rev()
        .zip(nb.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    while !(old.is_char_boundary(old.len() - suffix) && new.is_char_boundary(new.len() - suffix)) {
        suffix -= 1;
    }

    MinimalEdit {
        old: prefix..old.len() - suffix,
        new: prefix..new.len() - suffix,
    }
}

/// Carry a cursor across `edit`: untouched before the edit, shifted by the length
/// delta after it, and clamped into the replacement when it sat inside the edit.
fn shift_cursor(cursor: usize, edit: &MinimalEdit, old_len: usize, new_len: usize) -> usize {
    if cursor <= edit.old.start {
        cursor
    } else if cursor >= edit.old.end {
        new_len - (old_len - cursor)
    } else {
        cursor.clamp(edit.new.start, edit.new.end)
    }
}

/// Largest char boundary in `text` that is `<= offset`.
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    let mut idx = offset;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
