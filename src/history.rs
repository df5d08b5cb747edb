//! Bounded undo/redo queue for undoable commands.
//!
//! Commands land here only after their first invocation succeeded. Pushing a
//! new command discards everything that was undone before it.

use std::collections::VecDeque;

use crate::error::CommandError;

/// A command that has been applied once and can be rolled back and replayed
pub trait UndoableCommand<S: ?Sized> {
    fn name(&self) -> &str;

    fn undo_it(&mut self, scene: &mut S) -> Result<(), CommandError>;

    fn redo_it(&mut self, scene: &mut S) -> Result<(), CommandError>;
}

pub struct UndoQueue<S: ?Sized> {
    depth: usize,
    undo_stack: VecDeque<Box<dyn UndoableCommand<S> + Send>>,
    redo_stack: Vec<Box<dyn UndoableCommand<S> + Send>>,
}

impl<S: ?Sized> UndoQueue<S> {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Change the depth, dropping the oldest entries if the queue is now too long
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        self.trim();
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn push(&mut self, command: Box<dyn UndoableCommand<S> + Send>) {
        self.redo_stack.clear();
        if self.depth == 0 {
            log::debug!("Undo queue disabled, dropping {}", command.name());
            return;
        }
        self.undo_stack.push_back(command);
        self.trim();
    }

    /// Undo the most recent command. `Ok(false)` when there is nothing to undo.
    /// A command whose undo fails stays where it was.
    pub fn undo(&mut self, scene: &mut S) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = command.undo_it(scene) {
            self.undo_stack.push_back(command);
            return Err(e);
        }
        log::info!("Undo: {}", command.name());
        self.redo_stack.push(command);
        Ok(true)
    }

    /// Redo the most recently undone command. `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, scene: &mut S) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = command.redo_it(scene) {
            self.redo_stack.push(command);
            return Err(e);
        }
        log::info!("Redo: {}", command.name());
        self.undo_stack.push_back(command);
        Ok(true)
    }

    fn trim(&mut self) {
        while self.undo_stack.len() > self.depth {
            if let Some(dropped) = self.undo_stack.pop_front() {
                log::debug!("Undo queue full, discarding {}", dropped.name());
            }
        }
    }
}
