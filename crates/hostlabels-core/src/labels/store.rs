//! `LabelStore` — the ordered in-memory collection of host labels.
//!
//! Keys are not required to be unique. Lookups resolve duplicates by
//! returning the first entry in store order, and `add` with `overwrite`
//! updates that same first entry in place.

use super::types::{validate_entry, Label, LabelStoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelStore {
    labels: Vec<Label>,
}

impl LabelStore {
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Add a label. With `overwrite`, the first entry whose key matches has
    /// its value and hidden flag replaced without moving; otherwise (or when
    /// nothing matches) the label is appended at the end.
    pub fn add(
        &mut self,
        key: &str,
        value: &str,
        hidden: bool,
        overwrite: bool,
    ) -> Result<(), LabelStoreError> {
        validate_entry(key, value)?;

        if overwrite {
            if let Some(existing) = self.labels.iter_mut().find(|l| l.key == key) {
                existing.value = value.to_string();
                existing.hidden = hidden;
                return Ok(());
            }
        }

        self.labels.push(Label::new(key, value, hidden));
        Ok(())
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Value of the first label with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_label(key).map(|l| l.value.as_str())
    }

    pub fn get_label(&self, key: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.key == key)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.labels.iter()
    }

    /// Labels that are not flagged hidden, in store order.
    pub fn visible(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter().filter(|l| !l.hidden)
    }

    /// Independent deep copy. For an optional store, use
    /// `store.map(LabelStore::duplicate)`; an absent store stays absent.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

impl FromIterator<Label> for LabelStore {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LabelStore {
    type Item = Label;
    type IntoIter = std::vec::IntoIter<Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.into_iter()
    }
}

impl<'a> IntoIterator for &'a LabelStore {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}
