use glam::Mat4;

/// Stable identifier of a node inside a [`NodeTree`].
///
/// Assigned once at import and never reused; it is a plain index into the
/// tree's arena, so it stays valid for the lifetime of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(u32);

impl NodeIndex {
    #[inline]
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A transform-graph element as imported from the source asset.
///
/// Read-only once the tree is built: evaluation derives animated transforms
/// on the fly and never writes them back.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Bind-pose transform relative to the parent.
    pub transform: Mat4,
    /// Indices into the model's flat mesh list.
    pub meshes: Vec<usize>,
    pub(crate) children: Vec<NodeIndex>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_meshes(mut self, meshes: impl IntoIterator<Item = usize>) -> Self {
        self.meshes.extend(meshes);
        self
    }

    /// Child ids in source order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }
}

/// Arena-backed node hierarchy with a single root.
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
    root: NodeIndex,
    /// The root was added by the importer to parent several scene roots and
    /// has no counterpart in the source asset.
    synthetic_root: bool,
}

impl NodeTree {
    /// Creates a tree whose root is `root`.
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self {
            nodes: vec![root],
            root: NodeIndex::new(0),
            synthetic_root: false,
        }
    }

    /// Builds a tree from nodes whose `children` are already linked.
    ///
    /// Callers guarantee that every child id is in range and that the links
    /// form a tree below `root`.
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeIndex) -> Self {
        Self {
            nodes,
            root,
            synthetic_root: false,
        }
    }

    /// Like [`from_parts`](Self::from_parts), for a root the importer made up.
    ///
    /// The synthetic root is walked like any other node but never matches an
    /// animation channel or a bone by name.
    pub(crate) fn with_synthetic_root(nodes: Vec<Node>, root: NodeIndex) -> Self {
        Self {
            nodes,
            root,
            synthetic_root: true,
        }
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeIndex, node: Node) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(index);
        index
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Whether `index` is an importer-made root rather than an asset node.
    #[inline]
    #[must_use]
    pub fn is_synthetic(&self, index: NodeIndex) -> bool {
        self.synthetic_root && index == self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.index())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node (in id order) with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeIndex::new)
    }

    /// First asset node with the given name that the walk reaches from the
    /// root, in walk order. Nodes outside the active scene and the synthetic
    /// root never match.
    #[must_use]
    pub fn find_reachable(&self, name: &str) -> Option<NodeIndex> {
        self.walk(|index, node, _| {
            if node.name == name && !self.is_synthetic(index) {
                Err(index)
            } else {
                Ok(Mat4::IDENTITY)
            }
        })
        .err()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex::new(i), node))
    }

    /// Depth-first, pre-order walk from the root carrying accumulated
    /// transforms.
    ///
    /// `visit` receives the node and its parent's world transform (identity
    /// for the root) and returns the node's own world transform, which is
    /// handed down to its children. Siblings are visited in source order.
    pub fn walk<E>(
        &self,
        mut visit: impl FnMut(NodeIndex, &Node, Mat4) -> Result<Mat4, E>,
    ) -> Result<(), E> {
        let mut stack = vec![(self.root, Mat4::IDENTITY)];

        while let Some((index, parent_world)) = stack.pop() {
            let Some(node) = self.get(index) else {
                continue;
            };
            let world = visit(index, node, parent_world)?;
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }

        Ok(())
    }
}
