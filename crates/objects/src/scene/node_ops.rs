//! Node CRUD and grouping operations

use shared::{MeshSummary, NodeId, SceneDescription, SceneNode};

use super::{Scene, SceneError};

impl Scene {
    /// Attach `node` (with its subtree) as the last child of `parent`.
    ///
    /// An empty node ID is replaced by a fresh UUID.
    pub fn add_node(&self, parent: &str, mut node: SceneNode) -> Result<NodeId, SceneError> {
        if node.id.is_empty() {
            node.id = uuid::Uuid::new_v4().to_string();
        }
        let id = node.id.clone();
        self.try_edit(|d| {
            if let Some(dup) = node.depth_first().find(|v| d.find(&v.node.id).is_some()) {
                return Err(SceneError::DuplicateId(dup.node.id.clone()));
            }
            let parent = d
                .find_mut(parent)
                .ok_or_else(|| SceneError::NodeNotFound(parent.to_string()))?;
            parent.children.push(node);
            Ok(())
        })?;
        Ok(id)
    }

    /// Create a sliceable object with a mesh on the given build plate, under the root
    pub fn create_object(&self, name: &str, build_plate: i32) -> NodeId {
        let mut node = SceneNode::new(uuid::Uuid::new_v4().to_string(), name);
        node.mesh = Some(MeshSummary::default());
        node.decorations.sliceable = Some(true);
        node.decorations.build_plate = Some(build_plate);
        node.outside_build_area = Some(false);
        let id = node.id.clone();
        self.edit(|d| d.root.children.push(node));
        id
    }

    /// Detach a node and return it with its subtree
    pub fn remove_node(&self, id: &str) -> Result<SceneNode, SceneError> {
        self.try_edit(|d| {
            if d.root.id == id {
                return Err(SceneError::RootImmovable);
            }
            d.root
                .remove_descendant(id)
                .ok_or_else(|| SceneError::NodeNotFound(id.to_string()))
        })
    }

    /// Move the given nodes under a new group node.
    ///
    /// The group takes the place of the first node and inherits its build
    /// plate. A node that sits inside another listed node moves with it.
    pub fn group_nodes(&self, ids: &[NodeId]) -> Result<NodeId, SceneError> {
        let first = ids.first().ok_or(SceneError::EmptyGroup)?;
        let group_id = uuid::Uuid::new_v4().to_string();
        let result_id = group_id.clone();

        self.try_edit(|d| {
            for id in ids {
                check_movable(d, id)?;
            }
            let (mut parent_id, index) = location_of(d, first)?;
            let build_plate = d.find(first).map(|n| n.build_plate_number()).unwrap_or(0);

            let mut group = SceneNode::new(group_id, "Group");
            group.decorations.group = Some(true);
            group.decorations.build_plate = Some(build_plate);
            for id in ids {
                if let Some(node) = d.root.remove_descendant(id) {
                    group.children.push(node);
                }
            }

            // The parent may have been swept into the group itself
            if d.find(&parent_id).is_none() {
                parent_id = d.root.id.clone();
            }
            let parent = d
                .find_mut(&parent_id)
                .ok_or_else(|| SceneError::NodeNotFound(parent_id.clone()))?;
            let index = index.min(parent.children.len());
            parent.children.insert(index, group);
            Ok(())
        })?;

        tracing::info!("Grouped {} nodes into {}", ids.len(), result_id);
        Ok(result_id)
    }

    /// Dissolve a group; its children take its place in the parent
    pub fn ungroup(&self, id: &str) -> Result<Vec<NodeId>, SceneError> {
        self.try_edit(|d| {
            check_movable(d, id)?;
            if !d.find(id).map(SceneNode::is_group).unwrap_or(false) {
                return Err(SceneError::NotAGroup(id.to_string()));
            }
            let (parent_id, index) = location_of(d, id)?;
            let group = d
                .root
                .remove_descendant(id)
                .ok_or_else(|| SceneError::NodeNotFound(id.to_string()))?;
            let parent = d
                .find_mut(&parent_id)
                .ok_or_else(|| SceneError::NodeNotFound(parent_id.clone()))?;
            let ids = group.children.iter().map(|c| c.id.clone()).collect();
            for (offset, child) in group.children.into_iter().enumerate() {
                parent.children.insert(index + offset, child);
            }
            Ok(ids)
        })
    }

    /// Put a node and everything below it on a build plate
    pub fn set_build_plate(&self, id: &str, build_plate: i32) -> Result<(), SceneError> {
        self.try_edit(|d| {
            let node = d
                .find_mut(id)
                .ok_or_else(|| SceneError::NodeNotFound(id.to_string()))?;
            set_plate_recursive(node, build_plate);
            Ok(())
        })
    }

    pub fn set_outside_build_area(&self, id: &str, outside: bool) -> Result<(), SceneError> {
        self.try_edit(|d| {
            let node = d
                .find_mut(id)
                .ok_or_else(|| SceneError::NodeNotFound(id.to_string()))?;
            node.outside_build_area = Some(outside);
            Ok(())
        })
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<(), SceneError> {
        self.try_edit(|d| {
            let node = d
                .find_mut(id)
                .ok_or_else(|| SceneError::NodeNotFound(id.to_string()))?;
            node.name = name.to_string();
            Ok(())
        })
    }
}

fn check_movable(d: &SceneDescription, id: &str) -> Result<(), SceneError> {
    if d.root.id == id {
        return Err(SceneError::RootImmovable);
    }
    if d.find(id).is_none() {
        return Err(SceneError::NodeNotFound(id.to_string()));
    }
    Ok(())
}

/// Parent ID and child index of a non-root node
fn location_of(d: &SceneDescription, id: &str) -> Result<(NodeId, usize), SceneError> {
    let parent = d
        .root
        .parent_of(id)
        .ok_or_else(|| SceneError::NodeNotFound(id.to_string()))?;
    let index = parent
        .children
        .iter()
        .position(|c| c.id == id)
        .unwrap_or(parent.children.len());
    Ok((parent.id.clone(), index))
}

fn set_plate_recursive(node: &mut SceneNode, build_plate: i32) {
    node.decorations.build_plate = Some(build_plate);
    for child in &mut node.children {
        set_plate_recursive(child, build_plate);
    }
}
