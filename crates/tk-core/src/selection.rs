//! Selection set
//!
//! Either nothing, one member, or several members are selected; never a
//! single index and a set at the same time.

use std::collections::BTreeSet;

use crate::model::LogicalIndex;

/// How box-select candidates combine with the existing selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionModifier {
    /// No modifier: candidates replace the selection
    #[default]
    Replace,
    /// Ctrl: union
    Union,
    /// Alt: difference
    Subtract,
    /// Shift: symmetric difference
    Toggle,
}

/// Current selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionSet {
    #[default]
    Empty,
    Single(LogicalIndex),
    Multi(BTreeSet<LogicalIndex>),
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select exactly one member, dropping any multi selection
    pub fn select_single(&mut self, index: LogicalIndex) {
        *self = SelectionSet::Single(index);
    }

    /// Select a set, collapsing to single/empty when it has fewer than two members
    pub fn select_many(&mut self, indices: impl IntoIterator<Item = LogicalIndex>) {
        *self = Self::from_set(indices.into_iter().collect());
    }

    fn from_set(mut set: BTreeSet<LogicalIndex>) -> Self {
        match set.len() {
            0 => SelectionSet::Empty,
            1 => set.pop_first().map_or(SelectionSet::Empty, SelectionSet::Single),
            _ => SelectionSet::Multi(set),
        }
    }

    /// Combine box-select candidates with the current selection
    pub fn combine(
        &mut self,
        candidates: impl IntoIterator<Item = LogicalIndex>,
        modifier: SelectionModifier,
    ) {
        let candidates: BTreeSet<LogicalIndex> = candidates.into_iter().collect();
        let current = self.to_set();
        let combined = match modifier {
            SelectionModifier::Replace => candidates,
            SelectionModifier::Union => &current | &candidates,
            SelectionModifier::Subtract => &current - &candidates,
            SelectionModifier::Toggle => &current ^ &candidates,
        };
        *self = Self::from_set(combined);
    }

    pub fn clear(&mut self) {
        *self = SelectionSet::Empty;
    }

    pub fn contains(&self, index: LogicalIndex) -> bool {
        match self {
            SelectionSet::Empty => false,
            SelectionSet::Single(i) => *i == index,
            SelectionSet::Multi(set) => set.contains(&index),
        }
    }

    /// The selected member when exactly one is selected
    pub fn single(&self) -> Option<LogicalIndex> {
        match self {
            SelectionSet::Single(i) => Some(*i),
            _ => None,
        }
    }

    /// Selected members in ascending order
    pub fn indices(&self) -> Vec<LogicalIndex> {
        self.to_set().into_iter().collect()
    }

    pub fn len(&self) -> usize {
        match self {
            SelectionSet::Empty => 0,
            SelectionSet::Single(_) => 1,
            SelectionSet::Multi(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionSet::Empty)
    }

    /// Keep only members matching `keep`
    pub fn retain(&mut self, keep: impl Fn(LogicalIndex) -> bool) {
        let kept = self.to_set().into_iter().filter(|i| keep(*i)).collect();
        *self = Self::from_set(kept);
    }

    fn to_set(&self) -> BTreeSet<LogicalIndex> {
        match self {
            SelectionSet::Empty => BTreeSet::new(),
            SelectionSet::Single(i) => BTreeSet::from([*i]),
            SelectionSet::Multi(set) => set.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u32]) -> Vec<LogicalIndex> {
        values.iter().map(|v| LogicalIndex(*v)).collect()
    }

    fn prior() -> SelectionSet {
        let mut selection = SelectionSet::new();
        selection.select_many(ids(&[1, 2]));
        selection
    }

    #[test]
    fn test_replace() {
        let mut selection = prior();
        selection.combine(ids(&[3, 4]), SelectionModifier::Replace);
        assert_eq!(selection.indices(), ids(&[3, 4]));
    }

    #[test]
    fn test_union() {
        let mut selection = prior();
        selection.combine(ids(&[2, 3]), SelectionModifier::Union);
        assert_eq!(selection.indices(), ids(&[1, 2, 3]));
    }

    #[test]
    fn test_subtract() {
        let mut selection = prior();
        selection.combine(ids(&[2, 3]), SelectionModifier::Subtract);
        assert_eq!(selection, SelectionSet::Single(LogicalIndex(1)));
    }

    #[test]
    fn test_toggle() {
        let mut selection = prior();
        selection.combine(ids(&[2, 3]), SelectionModifier::Toggle);
        assert_eq!(selection.indices(), ids(&[1, 3]));
    }

    #[test]
    fn test_single_and_multi_are_exclusive() {
        let mut selection = prior();
        selection.select_single(LogicalIndex(7));
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.single(), Some(LogicalIndex(7)));
        assert!(!selection.contains(LogicalIndex(1)));

        selection.select_many(ids(&[3, 4]));
        assert_eq!(selection.single(), None);
        assert!(selection.contains(LogicalIndex(4)));
    }

    #[test]
    fn test_retain_drops_members() {
        let mut selection = prior();
        selection.retain(|i| i != LogicalIndex(2));
        assert_eq!(selection, SelectionSet::Single(LogicalIndex(1)));
    }
}
