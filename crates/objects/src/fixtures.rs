//! Factory functions for creating test scenes.
//!
//! Provides convenient helpers to construct `SceneNode` trees and
//! `SceneDescription`s used in tests and by the command protocol.

use shared::{LayerSummary, MeshSummary, SceneDescription, SceneNode};

// ── Node factories ──────────────────────────────────────────────

/// Sliceable object with a mesh on the given build plate.
pub fn mesh_node(id: &str, name: &str, build_plate: i32) -> SceneNode {
    let mut node = SceneNode::new(id, name);
    node.mesh = Some(MeshSummary {
        vertex_count: 8,
        face_count: 12,
    });
    node.decorations.sliceable = Some(true);
    node.decorations.build_plate = Some(build_plate);
    node.outside_build_area = Some(false);
    node
}

/// Sliceable node carrying only layer data (a loaded G-code, for example).
pub fn layer_node(id: &str, name: &str, build_plate: i32) -> SceneNode {
    let mut node = SceneNode::new(id, name);
    node.layer_data = Some(LayerSummary { layer_count: 120 });
    node.decorations.sliceable = Some(true);
    node.decorations.build_plate = Some(build_plate);
    node
}

/// Group node holding `children`.
pub fn group_node(id: &str, build_plate: i32, children: Vec<SceneNode>) -> SceneNode {
    let mut node = SceneNode::new(id, "Group");
    node.decorations.group = Some(true);
    node.decorations.build_plate = Some(build_plate);
    node.children = children;
    node
}

/// Node with a mesh that is not printable (build volume, disallowed areas).
pub fn support_node(id: &str, name: &str) -> SceneNode {
    let mut node = SceneNode::new(id, name);
    node.mesh = Some(MeshSummary::default());
    node
}

/// Node without payload or decorations (camera, lights).
pub fn empty_node(id: &str, name: &str) -> SceneNode {
    SceneNode::new(id, name)
}

// ── SceneDescription factories ──────────────────────────────────

/// Wrap top-level nodes into a scene.
pub fn scene_of(nodes: Vec<SceneNode>) -> SceneDescription {
    SceneDescription::with_nodes(nodes)
}

/// Objects and groups spread over build plates 0 and 1.
pub fn two_plate_nodes() -> Vec<SceneNode> {
    vec![
        mesh_node("a0", "A0", 0),
        group_node("g0", 0, vec![mesh_node("g0a", "G0 part", 0)]),
        mesh_node("b1", "B1", 1),
        group_node("g1", 1, vec![mesh_node("g1a", "G1 part", 1)]),
    ]
}

/// A scene the way a slicer usually has it: helpers next to printable objects.
pub fn typical_scene() -> SceneDescription {
    scene_of(vec![
        empty_node("camera", "3d"),
        support_node("volume", "BuildVolume"),
        mesh_node("benchy", "Benchy", 0),
        group_node(
            "bracket",
            0,
            vec![mesh_node("left", "Left", 0), mesh_node("right", "Right", 0)],
        ),
        layer_node("gcode", "calibration.gcode", 1),
    ])
}
