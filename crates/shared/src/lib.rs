use serde::{Deserialize, Serialize};

pub mod traversal;

pub use traversal::{DepthFirst, Visit};

/// Уникальный идентификатор узла сцены
pub type NodeId = String;

/// Идентификатор корневого узла
pub const ROOT_ID: &str = "root";

/// Сводка по сетке узла (сама геометрия здесь не хранится)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeshSummary {
    pub vertex_count: usize,
    pub face_count: usize,
}

/// Сводка по данным слоёв после нарезки
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerSummary {
    pub layer_count: usize,
}

/// Декорации узла, навешиваемые извне.
///
/// Каждое поле может отсутствовать; отсутствие читается как значение по умолчанию
/// (`false` или `0`), а не как ошибка.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Decorations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sliceable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_plate: Option<i32>,
}

impl Decorations {
    pub fn is_group(&self) -> bool {
        self.group.unwrap_or(false)
    }

    pub fn is_sliceable(&self) -> bool {
        self.sliceable.unwrap_or(false)
    }

    pub fn build_plate_number(&self) -> i32 {
        self.build_plate.unwrap_or(0)
    }
}

/// Узел сцены. Дочерние узлы принадлежат родителю.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_data: Option<LayerSummary>,
    #[serde(default)]
    pub decorations: Decorations,
    /// `None` if the node type cannot tell whether it is outside the build volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outside_build_area: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Bare node: no payload, no decorations, no children
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mesh: None,
            layer_data: None,
            decorations: Decorations::default(),
            outside_build_area: None,
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_ID, "Root")
    }

    pub fn has_mesh_data(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn has_layer_data(&self) -> bool {
        self.layer_data.is_some()
    }

    pub fn is_group(&self) -> bool {
        self.decorations.is_group()
    }

    pub fn is_sliceable(&self) -> bool {
        self.decorations.is_sliceable()
    }

    pub fn build_plate_number(&self) -> i32 {
        self.decorations.build_plate_number()
    }

    pub fn is_outside_build_area(&self) -> bool {
        self.outside_build_area.unwrap_or(false)
    }

    /// Pre-order depth-first walk starting at (and including) this node
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst::new(self)
    }

    /// Find a node by ID in this subtree
    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        self.depth_first().map(|v| v.node).find(|n| n.id == id)
    }

    /// Find a mutable node by ID in this subtree
    pub fn find_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Parent of `id`, if `id` is a strict descendant of this node
    pub fn parent_of(&self, id: &str) -> Option<&SceneNode> {
        self.depth_first()
            .find(|v| v.node.id == id)
            .and_then(|v| v.parent)
    }

    /// Detach a descendant and return it (with its subtree)
    pub fn remove_descendant(&mut self, id: &str) -> Option<SceneNode> {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .find_map(|c| c.remove_descendant(id))
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        self.depth_first().count()
    }
}

/// Описание сцены: корень дерева и версия формата
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub version: u32,
    pub root: SceneNode,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            version: 1,
            root: SceneNode::root(),
        }
    }
}

impl SceneDescription {
    /// Scene whose root holds the given top-level nodes
    pub fn with_nodes(nodes: Vec<SceneNode>) -> Self {
        let mut root = SceneNode::root();
        root.children = nodes;
        Self { version: 1, root }
    }

    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        self.root.find_mut(id)
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}
