//! Integration tests for the AgentCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> object list.

use objects_model::command::{execute_json, execute_json_batch};
use objects_model::fixtures::{group_node, mesh_node, scene_of, typical_scene};
use objects_model::harness::Harness;

#[test]
fn test_command_add_object() {
    let mut h = Harness::new();

    let json = r#"{"command": "add_object", "name": "Benchy", "build_plate": 0}"#;

    let resp = execute_json(&mut h, json).unwrap();
    assert!(resp.success);
    assert!(resp.data.as_ref().unwrap()["id"].as_str().is_some());
    assert_eq!(h.names(), vec!["Benchy"]);
    assert_eq!(h.notification_count(), 1);
}

#[test]
fn test_command_group_collapses_into_one_entry() {
    let mut h = Harness::new();
    let a = h.add_object("Left", 0);
    let b = h.add_object("Right", 0);

    let json = format!(r#"{{"command": "group", "ids": ["{a}", "{b}"]}}"#);
    let resp = execute_json(&mut h, &json).unwrap();
    assert!(resp.success, "{:?}", resp.error);

    let entries = h.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Group #1");
    assert!(h.model.index_of(&a).is_none());
    assert!(h.model.index_of(&b).is_none());
}

#[test]
fn test_command_ungroup_lists_children_again() {
    let mut h = Harness::with_scene(scene_of(vec![group_node(
        "g",
        0,
        vec![mesh_node("a", "Left", 0), mesh_node("b", "Right", 0)],
    )]));

    let resp = execute_json(&mut h, r#"{"command": "ungroup", "id": "g"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["ids"], serde_json::json!(["a", "b"]));
    assert_eq!(h.names(), vec!["Left", "Right"]);
}

#[test]
fn test_command_build_plate_workflow_via_json_batch() {
    let mut h = Harness::new();

    let json = r#"[
        {"command": "add_object", "name": "Plate0 part", "build_plate": 0},
        {"command": "add_object", "name": "Plate1 part", "build_plate": 1},
        {"command": "set_preference", "key": "view/filter_current_build_plate", "value": true},
        {"command": "set_active_build_plate", "build_plate": 1},
        {"command": "list_objects"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 5);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }

    let data = responses[4].data.as_ref().unwrap();
    assert_eq!(data["count"], 1);
    assert_eq!(data["active_build_plate"], 1);
    assert_eq!(data["objects"][0]["name"], "Plate1 part");
    assert_eq!(data["objects"][0]["buildPlateNumber"], 1);
}

#[test]
fn test_command_set_build_plate_moves_object_out_of_view() {
    let mut h = Harness::with_scene(typical_scene());
    h.set_filter_current_build_plate(true);
    h.set_active_build_plate(0);
    assert_eq!(h.names(), vec!["Benchy", "Group #1"]);

    let resp = execute_json(
        &mut h,
        r#"{"command": "set_build_plate", "id": "benchy", "build_plate": 1}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert_eq!(h.names(), vec!["Group #1"]);
}

#[test]
fn test_command_select_reflected_in_list() {
    let mut h = Harness::with_scene(typical_scene());

    let resp = execute_json(&mut h, r#"{"command": "select", "ids": ["bracket"]}"#).unwrap();
    assert!(resp.success);

    let selected: Vec<_> = h
        .entries()
        .into_iter()
        .filter(|e| e.is_selected)
        .map(|e| e.node)
        .collect();
    assert_eq!(selected, vec!["bracket".to_string()]);

    execute_json(&mut h, r#"{"command": "clear_selection"}"#).unwrap();
    assert!(h.entries().iter().all(|e| !e.is_selected));
}

#[test]
fn test_command_remove() {
    let mut h = Harness::with_scene(typical_scene());
    let resp = execute_json(&mut h, r#"{"command": "remove", "id": "bracket"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.names(), vec!["Benchy", "calibration.gcode"]);

    let resp = execute_json(&mut h, r#"{"command": "remove", "id": "bracket"}"#).unwrap();
    assert!(!resp.success);
}

#[test]
fn test_command_language_preference_renames_groups() {
    let mut h = Harness::with_scene(typical_scene());
    let resp = execute_json(
        &mut h,
        r#"{"command": "set_preference", "key": "general/language", "value": "ru"}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert!(h.names().contains(&"Группа #1".to_string()));
}

#[test]
fn test_command_stacks_have_errors() {
    let mut h = Harness::new();
    let resp = execute_json(&mut h, r#"{"command": "set_stacks_have_errors", "value": true}"#).unwrap();
    assert!(resp.success);

    let resp = execute_json(&mut h, r#"{"command": "list_objects"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["stacks_have_errors"], true);
    assert_eq!(h.notification_count(), 0);
}

#[test]
fn test_command_invalid_json_error() {
    let mut h = Harness::new();
    let result = execute_json(&mut h, "not valid json");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid command JSON"));
}

#[test]
fn test_command_unknown_command_error() {
    let mut h = Harness::new();
    let result = execute_json(&mut h, r#"{"command": "explode"}"#);
    assert!(result.is_err());
}

#[test]
fn test_command_rename_and_outside_flag() {
    let mut h = Harness::with_scene(typical_scene());

    let json = r#"[
        {"command": "rename", "id": "benchy", "name": "Tugboat"},
        {"command": "set_outside_build_area", "id": "benchy", "outside": true}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    assert!(responses.iter().all(|r| r.success));

    let index = h.model.index_of("benchy").unwrap();
    let entries = h.entries();
    let entry = &entries[index];
    assert_eq!(entry.name, "Tugboat");
    assert!(entry.is_outside_build_area);
    assert_eq!(h.names(), vec!["Group #1", "Tugboat", "calibration.gcode"]);
}

#[test]
fn test_command_clear_empties_list_and_notifies() {
    let mut h = Harness::with_scene(typical_scene());
    let before = h.notification_count();

    let resp = execute_json(&mut h, r#"{"command": "clear"}"#).unwrap();
    assert!(resp.success);
    assert!(h.entries().is_empty());
    assert_eq!(h.notification_count(), before + 1);
}
