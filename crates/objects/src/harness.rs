//! Headless harness wiring scene, selection, preferences and object list.
//!
//! Used by integration tests, the JSON command protocol and the CLI.

use std::cell::Cell;
use std::rc::Rc;

use shared::{NodeId, SceneDescription};

use crate::objects::{ObjectEntry, ObjectsModel};
use crate::preferences::{AppPreferences, Preferences};
use crate::scene::{Scene, SceneError};
use crate::selection::Selection;

pub struct Harness {
    pub scene: Rc<Scene>,
    pub selection: Rc<Selection>,
    pub preferences: Rc<Preferences>,
    pub model: Rc<ObjectsModel>,
    notifications: Rc<Cell<usize>>,
}

impl Harness {
    /// Empty scene, default preferences
    pub fn new() -> Self {
        Self::with_parts(SceneDescription::default(), AppPreferences::default())
    }

    pub fn with_scene(description: SceneDescription) -> Self {
        Self::with_parts(description, AppPreferences::default())
    }

    pub fn with_parts(description: SceneDescription, preferences: AppPreferences) -> Self {
        let scene = Rc::new(Scene::from_description(description));
        let selection = Rc::new(Selection::new());
        let preferences = Rc::new(Preferences::new(preferences));
        let model = ObjectsModel::create(
            Rc::clone(&scene),
            Rc::clone(&selection),
            Rc::clone(&preferences),
        );

        let notifications = Rc::new(Cell::new(0));
        let n = Rc::clone(&notifications);
        model.items_changed().connect(move |_| n.set(n.get() + 1));

        Self {
            scene,
            selection,
            preferences,
            model,
            notifications,
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Create a sliceable object and return its ID
    pub fn add_object(&mut self, name: &str, build_plate: i32) -> NodeId {
        self.scene.create_object(name, build_plate)
    }

    pub fn group(&mut self, ids: &[NodeId]) -> Result<NodeId, SceneError> {
        self.scene.group_nodes(ids)
    }

    /// Load a scene (replaces current) and clear the selection
    pub fn load_scene(&mut self, description: SceneDescription) {
        self.selection.clear();
        self.scene.set_scene(description);
    }

    /// Load a scene from JSON string
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let description: SceneDescription =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.load_scene(description);
        Ok(())
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.scene.snapshot())
    }

    // ── Object list ───────────────────────────────────────────

    pub fn entries(&self) -> Vec<ObjectEntry> {
        self.model.items().to_vec()
    }

    pub fn names(&self) -> Vec<String> {
        self.model.items().iter().map(|e| e.name.clone()).collect()
    }

    /// Number of `items_changed` notifications since the harness was built
    pub fn notification_count(&self) -> usize {
        self.notifications.get()
    }

    pub fn set_filter_current_build_plate(&mut self, value: bool) {
        self.preferences.set_filter_current_build_plate(value);
    }

    pub fn set_active_build_plate(&mut self, build_plate: i32) {
        self.model.set_active_build_plate(build_plate);
    }

    /// Select a node and refresh the list so the change shows up
    pub fn select(&mut self, id: &str) {
        self.selection.select(id.to_string());
        self.model.rebuild();
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::typical_scene;

    #[test]
    fn test_new_harness_is_empty() {
        let h = Harness::new();
        assert!(h.entries().is_empty());
        assert_eq!(h.notification_count(), 0);
    }

    #[test]
    fn test_typical_scene() {
        let h = Harness::with_scene(typical_scene());
        assert_eq!(h.names(), vec!["Benchy", "Group #1", "calibration.gcode"]);
    }

    #[test]
    fn test_scene_json_round_trip_through_harness() {
        let h = Harness::with_scene(typical_scene());
        let json = h.export_scene_json().unwrap();
        assert!(json.contains("\"benchy\""));

        let mut other = Harness::new();
        other.load_scene_json(&json).unwrap();
        assert_eq!(other.entries(), h.entries());
    }

    #[test]
    fn test_load_scene_json_error() {
        let mut h = Harness::new();
        let err = h.load_scene_json("{").unwrap_err();
        assert!(err.starts_with("JSON parse error"));
    }

    #[test]
    fn test_select_refreshes_list() {
        let mut h = Harness::with_scene(typical_scene());
        h.select("benchy");
        assert!(h.entries()[0].is_selected);
        assert!(!h.entries()[1].is_selected);
    }

    #[test]
    fn test_load_scene_clears_selection() {
        let mut h = Harness::with_scene(typical_scene());
        h.select("benchy");
        h.load_scene(typical_scene());
        assert_eq!(h.selection.count(), 0);
        assert!(h.entries().iter().all(|e| !e.is_selected));
    }
}
