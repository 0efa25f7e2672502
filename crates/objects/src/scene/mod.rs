//! Scene controller
//!
//! Owns the scene tree and announces every mutation through `scene_changed`.
//! Readers borrow the tree through [`Scene::with_graph`]; writers go through
//! [`Scene::edit`], which releases the borrow before notifying so that
//! observers can read the scene from their callbacks.

mod node_ops;

use std::cell::{Cell, RefCell};

use shared::{NodeId, SceneDescription};
use thiserror::Error;

use crate::signal::Signal;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("node id already in use: {0}")]
    DuplicateId(NodeId),
    #[error("the root node cannot be moved or removed")]
    RootImmovable,
    #[error("a group needs at least one node")]
    EmptyGroup,
    #[error("node is not a group: {0}")]
    NotAGroup(NodeId),
}

/// Scene tree plus change notification
#[derive(Debug, Default)]
pub struct Scene {
    description: RefCell<SceneDescription>,
    /// Monotonically increasing version counter, bumped on every mutation
    version: Cell<u64>,
    scene_changed: Signal<()>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(description: SceneDescription) -> Self {
        Self {
            description: RefCell::new(description),
            ..Self::default()
        }
    }

    /// Signal fired after every mutation
    pub fn scene_changed(&self) -> &Signal<()> {
        &self.scene_changed
    }

    /// Current scene version
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn root_id(&self) -> NodeId {
        self.with_graph(|d| d.root.id.clone())
    }

    /// Read-only access to the tree
    pub fn with_graph<R>(&self, f: impl FnOnce(&SceneDescription) -> R) -> R {
        f(&self.description.borrow())
    }

    /// Clone of the whole tree
    pub fn snapshot(&self) -> SceneDescription {
        self.description.borrow().clone()
    }

    /// Mutate the tree, then notify
    pub fn edit<R>(&self, f: impl FnOnce(&mut SceneDescription) -> R) -> R {
        let result = f(&mut self.description.borrow_mut());
        self.notify_mutated();
        result
    }

    /// Mutate the tree; notify only if the edit succeeded
    pub(crate) fn try_edit<R>(
        &self,
        f: impl FnOnce(&mut SceneDescription) -> Result<R, SceneError>,
    ) -> Result<R, SceneError> {
        let result = f(&mut self.description.borrow_mut());
        if result.is_ok() {
            self.notify_mutated();
        }
        result
    }

    /// Bump the version and fire `scene_changed`
    pub fn notify_mutated(&self) {
        self.version.set(self.version.get() + 1);
        self.scene_changed.emit(&());
    }

    /// Replace the whole scene
    pub fn set_scene(&self, description: SceneDescription) {
        tracing::info!(
            "Loaded scene ({} nodes)",
            description.root.node_count().saturating_sub(1)
        );
        self.edit(|d| *d = description);
    }

    /// Remove every node except the root
    pub fn clear(&self) {
        self.edit(|d| d.root.children.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_new_scene_is_empty() {
        let scene = Scene::new();
        assert!(scene.with_graph(|d| d.is_empty()));
        assert_eq!(scene.version(), 0);
        assert_eq!(scene.root_id(), shared::ROOT_ID);
    }

    #[test]
    fn test_edit_bumps_version_and_notifies() {
        let scene = Scene::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        scene.scene_changed().connect(move |_| h.set(h.get() + 1));

        scene.edit(|d| d.root.name = "Renamed".to_string());

        assert_eq!(scene.version(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_observer_can_read_during_notification() {
        let scene = Rc::new(Scene::new());
        let seen = Rc::new(RefCell::new(String::new()));

        let s = Rc::downgrade(&scene);
        let out = Rc::clone(&seen);
        scene.scene_changed().connect(move |_| {
            if let Some(s) = s.upgrade() {
                *out.borrow_mut() = s.with_graph(|d| d.root.name.clone());
            }
        });

        scene.edit(|d| d.root.name = "World".to_string());
        assert_eq!(*seen.borrow(), "World");
    }

    #[test]
    fn test_failed_edit_does_not_notify() {
        let scene = Scene::new();
        let result: Result<(), SceneError> =
            scene.try_edit(|_| Err(SceneError::NodeNotFound("x".to_string())));
        assert!(result.is_err());
        assert_eq!(scene.version(), 0);
    }
}
