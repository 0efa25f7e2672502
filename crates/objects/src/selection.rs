use std::cell::RefCell;

use shared::NodeId;

use crate::signal::Signal;

/// Scene node selection (supports multi-select)
#[derive(Debug, Default)]
pub struct Selection {
    /// Selected node IDs (in order of selection)
    selected: RefCell<Vec<NodeId>>,
    selection_changed: Signal<()>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired whenever the set of selected nodes changes
    pub fn selection_changed(&self) -> &Signal<()> {
        &self.selection_changed
    }

    /// Primary (first) selected node
    pub fn primary(&self) -> Option<NodeId> {
        self.selected.borrow().first().cloned()
    }

    /// All selected nodes
    pub fn all(&self) -> Vec<NodeId> {
        self.selected.borrow().clone()
    }

    /// Check if a node is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.borrow().iter().any(|s| s == id)
    }

    /// Select a single node (clears previous selection)
    pub fn select(&self, id: NodeId) {
        {
            let mut selected = self.selected.borrow_mut();
            selected.clear();
            selected.push(id);
        }
        self.selection_changed.emit(&());
    }

    /// Add a node to the selection; already selected nodes stay as they are
    pub fn add(&self, id: NodeId) {
        {
            let mut selected = self.selected.borrow_mut();
            if selected.contains(&id) {
                return;
            }
            selected.push(id);
        }
        self.selection_changed.emit(&());
    }

    /// Toggle selection (Ctrl+click behavior)
    pub fn toggle(&self, id: NodeId) {
        {
            let mut selected = self.selected.borrow_mut();
            if let Some(pos) = selected.iter().position(|s| s == &id) {
                selected.remove(pos);
            } else {
                selected.push(id);
            }
        }
        self.selection_changed.emit(&());
    }

    /// Clear all selection
    pub fn clear(&self) {
        let was_empty = {
            let mut selected = self.selected.borrow_mut();
            let was_empty = selected.is_empty();
            selected.clear();
            was_empty
        };
        if !was_empty {
            self.selection_changed.emit(&());
        }
    }

    /// Number of selected nodes
    pub fn count(&self) -> usize {
        self.selected.borrow().len()
    }
}
