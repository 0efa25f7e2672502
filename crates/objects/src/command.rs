//! JSON command protocol for driving the object list headlessly.
//!
//! Each command mutates the scene, selection or preferences of a [`Harness`]
//! and answers with a [`CommandResponse`].

use serde::{Deserialize, Serialize};
use shared::{NodeId, SceneNode};

use crate::harness::Harness;

/// A command that can be executed against a harness.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Create a sliceable object under the root
    AddObject {
        name: String,
        #[serde(default)]
        build_plate: i32,
    },
    /// Attach an arbitrary node (with its subtree); root if no parent given
    AddNode {
        #[serde(default)]
        parent: Option<NodeId>,
        node: SceneNode,
    },
    /// Remove a node and its subtree
    Remove {
        id: NodeId,
    },
    /// Group nodes under a new group node
    Group {
        ids: Vec<NodeId>,
    },
    /// Dissolve a group
    Ungroup {
        id: NodeId,
    },
    /// Rename a node
    Rename {
        id: NodeId,
        name: String,
    },
    /// Mark a node as inside or outside the printable volume
    SetOutsideBuildArea {
        id: NodeId,
        outside: bool,
    },
    /// Move a node (and its subtree) to a build plate
    SetBuildPlate {
        id: NodeId,
        build_plate: i32,
    },
    /// Replace the selection.
    Select {
        ids: Vec<NodeId>,
    },
    /// Clear selection.
    ClearSelection,
    /// Change the build plate the list is filtered to.
    SetActiveBuildPlate {
        build_plate: i32,
    },
    /// Change a preference by key.
    SetPreference {
        key: String,
        value: serde_json::Value,
    },
    /// Set the per-object settings error flag.
    SetStacksHaveErrors {
        value: bool,
    },
    /// Remove every node from the scene.
    Clear,
    /// Return the published object list.
    ListObjects,
    /// Export the scene as JSON.
    ExportScene,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_result<T, E: std::fmt::Display>(
        result: Result<T, E>,
        data: impl FnOnce(T) -> serde_json::Value,
    ) -> Self {
        match result {
            Ok(v) => Self::ok_with_data(data(v)),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut Harness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::AddObject { name, build_plate } => {
            let id = harness.add_object(&name, build_plate);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::AddNode { parent, node } => {
            let parent = parent.unwrap_or_else(|| harness.scene.root_id());
            CommandResponse::from_result(harness.scene.add_node(&parent, node), |id| {
                serde_json::json!({ "id": id })
            })
        }

        AgentCommand::Remove { id } => {
            CommandResponse::from_result(harness.scene.remove_node(&id), |node| {
                serde_json::json!({ "removed": node.id })
            })
        }

        AgentCommand::Group { ids } => CommandResponse::from_result(harness.group(&ids), |id| {
            serde_json::json!({ "id": id })
        }),

        AgentCommand::Ungroup { id } => {
            CommandResponse::from_result(harness.scene.ungroup(&id), |ids| {
                serde_json::json!({ "ids": ids })
            })
        }

        AgentCommand::Rename { id, name } => match harness.scene.rename(&id, &name) {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::SetOutsideBuildArea { id, outside } => {
            match harness.scene.set_outside_build_area(&id, outside) {
                Ok(()) => CommandResponse::ok(),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::SetBuildPlate { id, build_plate } => {
            match harness.scene.set_build_plate(&id, build_plate) {
                Ok(()) => CommandResponse::ok(),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Select { ids } => {
            harness.selection.clear();
            for id in &ids {
                harness.selection.add(id.clone());
            }
            harness.model.rebuild();
            CommandResponse::ok_with_data(serde_json::json!({ "selected": ids }))
        }

        AgentCommand::ClearSelection => {
            harness.selection.clear();
            harness.model.rebuild();
            CommandResponse::ok()
        }

        AgentCommand::SetActiveBuildPlate { build_plate } => {
            harness.set_active_build_plate(build_plate);
            CommandResponse::ok()
        }

        AgentCommand::SetPreference { key, value } => {
            match harness.preferences.set_value(&key, value) {
                Ok(()) => CommandResponse::ok(),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::SetStacksHaveErrors { value } => {
            harness.model.set_stacks_have_errors(value);
            CommandResponse::ok()
        }

        AgentCommand::Clear => {
            harness.scene.clear();
            CommandResponse::ok()
        }

        AgentCommand::ListObjects => {
            let objects = harness.entries();
            CommandResponse::ok_with_data(serde_json::json!({
                "count": objects.len(),
                "active_build_plate": harness.model.active_build_plate(),
                "stacks_have_errors": harness.model.stacks_have_errors(),
                "objects": objects,
            }))
        }

        AgentCommand::ExportScene => {
            CommandResponse::from_result(harness.export_scene_json(), |json| {
                serde_json::json!({ "scene_json": json })
            })
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut Harness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut Harness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
