//! Object list model
//!
//! Flattens the scene tree into the sorted list shown by the object list panel.
//! The list is rebuilt from scratch whenever the scene or any preference
//! changes, and observers are told through `items_changed` after every rebuild.
//!
//! A node is listed when all of the following hold:
//! - it carries a mesh or layer data, or it is a group;
//! - its parent is not a group (grouped nodes are represented by the group);
//! - it is sliceable, or it is a group;
//! - with `view/filter_current_build_plate` on, it sits on the active build plate.
//!
//! Groups are named "Group #N" in the order they are met during a pre-order
//! walk of the scene; the numbering restarts on every rebuild.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;
use shared::{NodeId, SceneDescription, Visit};

use crate::i18n::{group_label, Lang};
use crate::preferences::Preferences;
use crate::scene::Scene;
use crate::selection::Selection;
use crate::signal::{Signal, SlotId};

/// One row of the object list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    pub name: String,
    pub is_selected: bool,
    pub is_outside_build_area: bool,
    pub build_plate_number: i32,
    /// Scene node this row stands for
    pub node: NodeId,
}

/// Why a node was left out of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither mesh nor layer data, and not a group
    NoPayload,
    /// Child of a group
    Grouped,
    /// Not sliceable, and not a group
    NotSliceable,
    /// On another build plate while plate filtering is on
    OtherBuildPlate,
}

/// Run the filter chain on one visited node.
///
/// `plate_filter` is the active build plate when filtering by plate is on.
pub fn admit(visit: Visit<'_>, plate_filter: Option<i32>) -> Result<(), SkipReason> {
    let node = visit.node;
    if !node.has_mesh_data() && !node.has_layer_data() && !node.is_group() {
        return Err(SkipReason::NoPayload);
    }
    if visit.parent.map(|p| p.is_group()).unwrap_or(false) {
        return Err(SkipReason::Grouped);
    }
    if !node.is_sliceable() && !node.is_group() {
        return Err(SkipReason::NotSliceable);
    }
    match plate_filter {
        Some(plate) if node.build_plate_number() != plate => Err(SkipReason::OtherBuildPlate),
        _ => Ok(()),
    }
}

/// Sorted, filtered list of the printable objects in the scene
pub struct ObjectsModel {
    scene: Rc<Scene>,
    selection: Rc<Selection>,
    preferences: Rc<Preferences>,
    active_build_plate: Cell<i32>,
    stacks_have_errors: Cell<Option<bool>>,
    /// Published list; replaced as a whole on every rebuild
    items: RefCell<Rc<[ObjectEntry]>>,
    items_changed: Signal<()>,
    scene_slot: Cell<Option<SlotId>>,
    preference_slot: Cell<Option<SlotId>>,
}

impl ObjectsModel {
    /// Build the model, wire it to scene and preference changes, and fill it once.
    ///
    /// The model starts with no active build plate (`-1`), so with plate
    /// filtering on it stays empty until [`set_active_build_plate`] is called.
    ///
    /// [`set_active_build_plate`]: ObjectsModel::set_active_build_plate
    pub fn create(
        scene: Rc<Scene>,
        selection: Rc<Selection>,
        preferences: Rc<Preferences>,
    ) -> Rc<Self> {
        let model = Rc::new(Self {
            scene,
            selection,
            preferences,
            active_build_plate: Cell::new(-1),
            stacks_have_errors: Cell::new(None),
            items: RefCell::new(Rc::from(Vec::new())),
            items_changed: Signal::new(),
            scene_slot: Cell::new(None),
            preference_slot: Cell::new(None),
        });

        let weak = Rc::downgrade(&model);
        let slot = model.scene.scene_changed().connect(move |_| {
            if let Some(model) = weak.upgrade() {
                model.rebuild();
            }
        });
        model.scene_slot.set(Some(slot));

        // Any preference may be the one that matters, so no filtering on the key
        let weak = Rc::downgrade(&model);
        let slot = model.preferences.preference_changed().connect(move |key| {
            if let Some(model) = weak.upgrade() {
                tracing::trace!("Preference {key} changed, rebuilding object list");
                model.rebuild();
            }
        });
        model.preference_slot.set(Some(slot));

        model.rebuild();
        model
    }

    /// Fired after every rebuild, including ones that produce an empty list
    pub fn items_changed(&self) -> &Signal<()> {
        &self.items_changed
    }

    pub fn active_build_plate(&self) -> i32 {
        self.active_build_plate.get()
    }

    /// Switch the active build plate and rebuild right away
    pub fn set_active_build_plate(&self, build_plate: i32) {
        self.active_build_plate.set(build_plate);
        self.rebuild();
    }

    /// Whether any per-object settings stack reported errors (false if never set)
    pub fn stacks_have_errors(&self) -> bool {
        self.stacks_have_errors.get().unwrap_or(false)
    }

    pub fn set_stacks_have_errors(&self, value: bool) {
        self.stacks_have_errors.set(Some(value));
    }

    /// Recompute the list from the current scene and publish it
    pub fn rebuild(&self) {
        let filter_current_build_plate = self.preferences.filter_current_build_plate();
        let active_build_plate = self.active_build_plate.get();
        let lang = self.preferences.language();
        let plate_filter = filter_current_build_plate.then_some(active_build_plate);

        let mut entries = self
            .scene
            .with_graph(|d| self.collect(d, plate_filter, lang));
        // Stable: equal names keep traversal order
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            "Object list rebuilt: {} entries (active plate {}, filter {})",
            entries.len(),
            active_build_plate,
            filter_current_build_plate
        );

        *self.items.borrow_mut() = Rc::from(entries);
        self.items_changed.emit(&());
    }

    fn collect(
        &self,
        description: &SceneDescription,
        plate_filter: Option<i32>,
        lang: Lang,
    ) -> Vec<ObjectEntry> {
        let mut entries = Vec::new();
        let mut group_nr = 1;

        for visit in description.root.depth_first() {
            if let Err(reason) = admit(visit, plate_filter) {
                tracing::trace!("Skipping node {}: {:?}", visit.node.id, reason);
                continue;
            }
            let node = visit.node;

            let name = if node.is_group() {
                let name = group_label(lang, group_nr);
                group_nr += 1;
                name
            } else {
                node.name.clone()
            };

            entries.push(ObjectEntry {
                name,
                is_selected: self.selection.is_selected(&node.id),
                is_outside_build_area: node.is_outside_build_area(),
                build_plate_number: node.build_plate_number(),
                node: node.id.clone(),
            });
        }
        entries
    }

    /// Snapshot of the published list
    pub fn items(&self) -> Rc<[ObjectEntry]> {
        Rc::clone(&self.items.borrow())
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ObjectEntry> {
        self.items.borrow().get(index).cloned()
    }

    /// Row of the given scene node, if it is listed
    pub fn index_of(&self, node: &str) -> Option<usize> {
        self.items.borrow().iter().position(|e| e.node == node)
    }

    /// Select the node behind a row (Ctrl+click toggles with `extend`).
    ///
    /// Returns false if the row does not exist. The list itself is not
    /// rebuilt; `is_selected` catches up on the next rebuild.
    pub fn select_entry(&self, index: usize, extend: bool) -> bool {
        let Some(entry) = self.get(index) else {
            return false;
        };
        if extend {
            self.selection.toggle(entry.node);
        } else {
            self.selection.select(entry.node);
        }
        true
    }
}

impl Drop for ObjectsModel {
    fn drop(&mut self) {
        if let Some(slot) = self.scene_slot.take() {
            self.scene.scene_changed().disconnect(slot);
        }
        if let Some(slot) = self.preference_slot.take() {
            self.preferences.preference_changed().disconnect(slot);
        }
    }
}

impl std::fmt::Debug for ObjectsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectsModel")
            .field("active_build_plate", &self.active_build_plate.get())
            .field("stacks_have_errors", &self.stacks_have_errors.get())
            .field("items", &self.items.borrow().len())
            .finish()
    }
}
