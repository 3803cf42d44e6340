use serde::{Deserialize, Serialize};

use super::rows::{ClaimRow, FieldError};

/// Upper bound on rows per section. Posted row keys beyond it are rejected.
pub const MAX_ROWS: usize = 200;

/// An ordered, never-empty list of rows for one claim category.
///
/// New rows come from `R::default()`, so there is no template row to copy and
/// the list cannot be emptied: removing the last remaining row is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<R>", into = "Vec<R>", bound = "R: ClaimRow")]
pub struct Section<R: ClaimRow> {
    rows: Vec<R>,
}

impl<R: ClaimRow> Default for Section<R> {
    fn default() -> Self {
        Self { rows: vec![R::default()] }
    }
}

impl<R: ClaimRow> From<Vec<R>> for Section<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::from_rows(rows)
    }
}

impl<R: ClaimRow> From<Section<R>> for Vec<R> {
    fn from(section: Section<R>) -> Self {
        section.rows
    }
}

impl<R: ClaimRow> Section<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `rows` verbatim; an empty list becomes the single default row.
    pub fn from_rows(rows: Vec<R>) -> Self {
        if rows.is_empty() {
            Self::default()
        } else {
            Self { rows }
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn can_remove(&self) -> bool {
        self.rows.len() > 1
    }

    /// Append a default row. Declines (returns false) at `MAX_ROWS`.
    pub fn add_row(&mut self) -> bool {
        if self.rows.len() >= MAX_ROWS {
            return false;
        }
        self.rows.push(R::default());
        true
    }

    /// Grow the section with default rows until `index` is addressable.
    /// Indexes at or past `MAX_ROWS` leave the section unchanged.
    pub fn ensure_row(&mut self, index: usize) {
        if index >= MAX_ROWS {
            return;
        }
        while self.rows.len() <= index {
            self.add_row();
        }
    }

    /// Remove the row at `index`. Declines silently (returns false) when the
    /// section holds a single row or the index is out of range.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if !self.can_remove() || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Replace one field of one row, leaving everything else untouched.
    pub fn update_field(&mut self, index: usize, field: &str, value: &str) -> Result<(), FieldError> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(FieldError::RowOutOfRange { index, len })?;
        row.set_field(field, value)
    }

    pub fn complete_rows(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().filter(|r| r.is_complete())
    }
}
