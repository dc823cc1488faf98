//! Position undo/redo history
//!
//! One global pair of stacks covers the whole array: undo always reverts the
//! most recent committed move, whichever member it touched.

use std::collections::VecDeque;

use glam::Vec3;

use crate::model::LogicalIndex;

/// A committed position change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub index: LogicalIndex,
    pub prev: Vec3,
    pub next: Vec3,
}

/// Global undo/redo stacks of position mutations
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(200)
    }
}

impl HistoryManager {
    /// History keeping at most `limit` undo entries (at least one)
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a committed mutation; clears the redo stack
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(entry);
        self.redo.clear();
    }

    /// Pop the latest entry for reverting. The caller restores `entry.prev`.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo.pop_back()?;
        self.redo.push(entry);
        Some(entry)
    }

    /// Pop the latest undone entry for reapplying. The caller restores `entry.next`.
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo.pop()?;
        self.undo.push_back(entry);
        Some(entry)
    }

    /// Entry the next `undo` would return
    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        self.undo.back()
    }

    /// Entry the next `redo` would return
    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.redo.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable entries
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: u32, prev: f32, next: f32) -> HistoryEntry {
        HistoryEntry {
            index: LogicalIndex(index),
            prev: Vec3::splat(prev),
            next: Vec3::splat(next),
        }
    }

    #[test]
    fn test_undo_is_global_and_ordered() {
        let mut history = HistoryManager::default();
        history.push(entry(0, 0.0, 1.0));
        history.push(entry(5, 0.0, 2.0));
        assert_eq!(history.undo().unwrap().index, LogicalIndex(5));
        assert_eq!(history.undo().unwrap().index, LogicalIndex(0));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_redo_mirrors_undo() {
        let mut history = HistoryManager::default();
        history.push(entry(1, 0.0, 3.0));
        let undone = history.undo().unwrap();
        assert!(history.can_redo());
        let redone = history.redo().unwrap();
        assert_eq!(undone, redone);
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn test_peek_leaves_stacks_alone() {
        let mut history = HistoryManager::default();
        assert!(history.peek_undo().is_none());
        history.push(entry(4, 0.0, 1.0));
        assert_eq!(history.peek_undo().map(|e| e.index), Some(LogicalIndex(4)));
        assert_eq!(history.len(), 1);
        history.undo();
        assert_eq!(history.peek_redo().map(|e| e.index), Some(LogicalIndex(4)));
        assert!(history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = HistoryManager::default();
        history.push(entry(1, 0.0, 3.0));
        history.undo();
        history.push(entry(2, 0.0, 4.0));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = HistoryManager::new(2);
        history.push(entry(1, 0.0, 1.0));
        history.push(entry(2, 0.0, 1.0));
        history.push(entry(3, 0.0, 1.0));
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo().unwrap().index, LogicalIndex(3));
        assert_eq!(history.undo().unwrap().index, LogicalIndex(2));
        assert!(history.undo().is_none());
    }
}
