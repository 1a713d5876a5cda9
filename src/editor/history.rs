use std::collections::VecDeque;

use crate::model::frame::{Frame, FrameSnapshot};

/// Bounded undo/redo over snapshots of a single frame.
///
/// The owner decides which frame the history belongs to and calls
/// [`History::clear`] when the edited frame changes.
#[derive(Clone, Debug)]
pub struct History {
    undo: VecDeque<FrameSnapshot>,
    redo: Vec<FrameSnapshot>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Records the pre-image of `frame` before a mutation and drops the redo branch.
    pub fn snapshot(&mut self, frame: &Frame) {
        self.undo.push_back(frame.snapshot());
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Restores the latest snapshot into `frame`. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, frame: &mut Frame) -> bool {
        let Some(prev) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(frame.snapshot());
        frame.restore(prev);
        true
    }

    pub fn redo(&mut self, frame: &mut Frame) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push_back(frame.snapshot());
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        frame.restore(next);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/history.rs"]
mod tests;
