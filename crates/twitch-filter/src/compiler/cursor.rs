//! Bounded cursor over query text.

use super::error::StructuralError;

/// A position over the characters of a non-empty query.
///
/// The cursor never leaves `[0, len - 1]`: [`advance`](Cursor::advance) and
/// [`retreat`](Cursor::retreat) fail instead of moving out of range.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// Characters with their byte offsets in the source text.
    chars: Vec<(usize, char)>,
    position: usize,
}

impl Cursor {
    /// Creates a cursor at index 0, or `None` when `source` is empty.
    pub fn new(source: &str) -> Option<Self> {
        let chars: Vec<(usize, char)> = source.char_indices().collect();
        if chars.is_empty() {
            return None;
        }
        Some(Self { chars, position: 0 })
    }

    /// Current character index.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte offset of the current character.
    pub fn offset(&self) -> usize {
        self.chars[self.position].0
    }

    /// Character under the cursor.
    pub fn current(&self) -> char {
        self.chars[self.position].1
    }

    /// Number of characters after the current one.
    pub fn remaining(&self) -> usize {
        self.chars.len() - 1 - self.position
    }

    /// Whether [`advance`](Cursor::advance) would succeed.
    pub fn has_next(&self) -> bool {
        self.remaining() > 0
    }

    /// Moves to the next character.
    pub fn advance(&mut self) -> Result<(), StructuralError> {
        if !self.has_next() {
            return Err(StructuralError::PastEnd {
                position: self.position,
            });
        }
        self.position += 1;
        Ok(())
    }

    /// Moves back to the previous character.
    pub fn retreat(&mut self) -> Result<(), StructuralError> {
        if self.position == 0 {
            return Err(StructuralError::BeforeStart);
        }
        self.position -= 1;
        Ok(())
    }
}
