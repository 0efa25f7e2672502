//! Pre-order depth-first traversal of the scene tree.
//!
//! Each step yields the node together with a borrowed reference to its parent.
//! The parent is never owned by the child; it is only available while walking.

use crate::SceneNode;

/// A visited node and its parent (`None` for the node the walk started at)
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: &'a SceneNode,
    pub parent: Option<&'a SceneNode>,
}

/// Iterator over a subtree in pre-order, siblings in their stored order
pub struct DepthFirst<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> DepthFirst<'a> {
    pub fn new(start: &'a SceneNode) -> Self {
        Self {
            stack: vec![Visit {
                node: start,
                parent: None,
            }],
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        // Reverse so the first child is popped first
        for child in visit.node.children.iter().rev() {
            self.stack.push(Visit {
                node: child,
                parent: Some(visit.node),
            });
        }
        Some(visit)
    }
}

#[cfg(test)]
mod tests {
    use crate::SceneNode;

    fn tree() -> SceneNode {
        let mut a = SceneNode::new("a", "A");
        a.children = vec![SceneNode::new("a1", "A1"), SceneNode::new("a2", "A2")];
        let mut root = SceneNode::root();
        root.children = vec![a, SceneNode::new("b", "B")];
        root
    }

    #[test]
    fn test_pre_order() {
        let root = tree();
        let ids: Vec<&str> = root.depth_first().map(|v| v.node.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_parents() {
        let root = tree();
        let parents: Vec<Option<&str>> = root
            .depth_first()
            .map(|v| v.parent.map(|p| p.id.as_str()))
            .collect();
        assert_eq!(
            parents,
            vec![None, Some("root"), Some("a"), Some("a"), Some("root")]
        );
    }

    #[test]
    fn test_leaf_only() {
        let leaf = SceneNode::new("x", "X");
        assert_eq!(leaf.depth_first().count(), 1);
    }
}
