//! Typed query results.
//!
//! Repository reads return `ZeroOrOne` for lookups by key and `ManyOf` for
//! listings, so callers state which shape they expect instead of inspecting
//! raw rows.

use serde::Serialize;

/// Result of a lookup that matches at most one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroOrOne<T>(Option<T>);

impl<T> ZeroOrOne<T> {
    /// A lookup that matched nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Returns true when no row matched.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Returns true when a row matched.
    #[must_use]
    pub const fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the row, if any.
    pub fn into_option(self) -> Option<T> {
        self.0
    }

    /// Returns the row or the error built by `missing`.
    ///
    /// # Errors
    ///
    /// Returns `missing()` when no row matched.
    pub fn required<E>(self, missing: impl FnOnce() -> E) -> Result<T, E> {
        self.0.ok_or_else(missing)
    }

    /// Maps the row, if any.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ZeroOrOne<U> {
        ZeroOrOne(self.0.map(f))
    }
}

impl<T> From<Option<T>> for ZeroOrOne<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

/// Result of a listing; possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ManyOf<T>(Vec<T>);

impl<T> ManyOf<T> {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the listing is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Returns the rows.
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    /// Maps every row.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ManyOf<U> {
        ManyOf(self.0.into_iter().map(f).collect())
    }
}

impl<T> Default for ManyOf<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for ManyOf<T> {
    fn from(value: Vec<T>) -> Self {
        Self(value)
    }
}

impl<T> IntoIterator for ManyOf<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ManyOf<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
