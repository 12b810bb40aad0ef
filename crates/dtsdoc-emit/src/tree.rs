//! Doclet tree builder.
//!
//! Doclets name their parent through `memberof` instead of being nested, so
//! the tree is built in two passes over an arena: pass one creates a node per
//! surviving doclet and records it in a longname lookup table, pass two links
//! every node under its parent. Synthetic merge nodes are created during
//! linking for declarations one doclet cannot express alone:
//!
//! - a class with `implements`/`mixes` gets a sibling interface carrying
//!   those as heritage;
//! - an interface or mixin with static members gets a sibling namespace
//!   that takes over the static members;
//! - class-like doclets get a companion namespace on demand, holding the
//!   nested classes, namespaces, enums and typedefs a class body cannot.

use indexmap::IndexMap;
use tracing::debug;

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::doclet::{Doclet, DocletKind, Scope};
use crate::options::EmitOptions;

const INTERFACE_MERGE_SUFFIX: &str = "$$interface$helper";
const NAMESPACE_MERGE_SUFFIX: &str = "$$namespace$helper";

/// Lookup key of the interface-merge node for `longname`.
pub fn interface_merge_key(longname: &str) -> String {
    format!("{longname}{INTERFACE_MERGE_SUFFIX}")
}

/// Lookup key of the namespace-merge (and companion namespace) node for
/// `longname`.
pub fn namespace_merge_key(longname: &str) -> String {
    format!("{longname}{NAMESPACE_MERGE_SUFFIX}")
}

/// Index of a node in its [`DocletTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Which kind of synthetic node this is, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    Interface,
    Namespace,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub doclet: Doclet,
    pub children: Vec<NodeId>,
    /// Structural parent, set once when the node is attached.
    pub parent: Option<NodeId>,
    /// A module or namespace declared inside another one.
    pub is_nested: bool,
    pub merge: Option<MergeKind>,
    placed: bool,
}

impl TreeNode {
    fn new(doclet: Doclet, merge: Option<MergeKind>) -> Self {
        Self {
            doclet,
            children: Vec::new(),
            parent: None,
            is_nested: false,
            merge,
            placed: false,
        }
    }

    /// Whether this node exists only to host merged declarations.
    pub fn is_synthetic(&self) -> bool {
        self.merge.is_some()
    }
}

/// The forest of doclet nodes plus the longname lookup table.
#[derive(Debug, Default)]
pub struct DocletTree {
    nodes: Vec<TreeNode>,
    lookup: IndexMap<String, NodeId>,
    roots: Vec<NodeId>,
}

impl DocletTree {
    /// Filter `docs` by `options` and link the survivors into a forest.
    pub fn build(docs: &[Doclet], options: &EmitOptions, diags: &mut Diagnostics) -> Self {
        let mut tree = DocletTree::default();

        // Pass 1: one node per surviving doclet, first longname wins.
        for doclet in docs.iter().filter(|doclet| options.keeps(doclet)) {
            if tree.lookup.contains_key(&doclet.longname) {
                debug!(longname = %doclet.longname, "skipping duplicate doclet");
                continue;
            }
            tree.insert(doclet.clone(), None);
        }
        debug!(nodes = tree.nodes.len(), "created doclet nodes");

        // Pass 2: link in input order. Merge nodes are appended during
        // linking and are placed by their owner, never linked themselves.
        let created = tree.nodes.len();
        for idx in 0..created {
            tree.link(NodeId(idx), diags);
        }

        tree
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn lookup(&self, longname: &str) -> Option<NodeId> {
        self.lookup.get(longname).copied()
    }

    pub fn get(&self, longname: &str) -> Option<&TreeNode> {
        self.lookup(longname).map(|id| self.node(id))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> {
        self.node(id).children.iter().map(|&child| self.node(child))
    }

    /// Longnames of the roots, in forest order.
    pub fn root_names(&self) -> Vec<&str> {
        self.roots
            .iter()
            .map(|&id| self.node(id).doclet.longname.as_str())
            .collect()
    }

    /// Longnames of a node's children, in order.
    pub fn child_names(&self, id: NodeId) -> Vec<&str> {
        self.children(id)
            .map(|child| child.doclet.longname.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A forest of one unfiltered root.
    #[cfg(test)]
    pub(crate) fn single(doclet: Doclet) -> Self {
        let mut tree = Self::default();
        let id = tree.insert(doclet, None);
        tree.push_root(id);
        tree
    }

    fn insert(&mut self, doclet: Doclet, merge: Option<MergeKind>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.lookup.insert(doclet.longname.clone(), id);
        self.nodes.push(TreeNode::new(doclet, merge));
        id
    }

    fn link(&mut self, id: NodeId, diags: &mut Diagnostics) {
        let kind = self.nodes[id.0].doclet.kind;
        let mut merges = Vec::with_capacity(2);

        if kind == DocletKind::Class {
            if let Some(merge) = self.interface_merge(id) {
                merges.push(merge);
            }
        }
        if kind.is_interface_like() {
            self.namespace_merge(id, diags);
        }
        if kind.is_class_like() {
            // A namespace requested before its owner was linked goes next to it.
            let key = namespace_merge_key(&self.nodes[id.0].doclet.longname);
            if let Some(namespace) = self.lookup(&key) {
                if !self.nodes[namespace.0].placed {
                    merges.push(namespace);
                }
            }
        }

        let longname = self.nodes[id.0].doclet.longname.clone();
        let Some(memberof) = self.nodes[id.0].doclet.memberof.clone() else {
            for merge in merges {
                self.push_root(merge);
            }
            self.push_root(id);
            return;
        };

        let Some(parent) = self.lookup(&memberof) else {
            diags.warn(
                WarningKind::UnresolvedParent,
                format!(
                    "Failed to find parent of doclet '{longname}' using memberof '{memberof}', \
                     this is likely due to invalid JSDoc."
                ),
            );
            return;
        };

        let parent_doclet = &self.nodes[parent.0].doclet;
        let parent_is_class_like = parent_doclet.kind.is_class_like();
        let parent_is_module_like = parent_doclet.kind.is_module_like();
        let parent_is_enum = parent_doclet.is_enum();

        if parent_is_class_like && self.nodes[id.0].doclet.moves_out_of_class() {
            let container = self.companion_namespace(parent);
            for merge in merges {
                self.attach(container, merge, diags);
            }
            self.attach(container, id, diags);
            return;
        }

        if kind.is_module_like() && parent_is_module_like {
            self.nodes[id.0].is_nested = true;
        }

        if parent_is_enum {
            // Enum members come from `properties`; only merges survive.
            debug!(%longname, "dropping child of enum '{memberof}'");
            for merge in merges {
                self.push_root(merge);
            }
            return;
        }

        for merge in merges {
            self.attach(parent, merge, diags);
        }
        self.attach(parent, id, diags);
    }

    /// Create the interface carrying a class's `implements` and `mixes`.
    ///
    /// Returns the node only when it was created by this call.
    fn interface_merge(&mut self, class: NodeId) -> Option<NodeId> {
        let doclet = &self.nodes[class.0].doclet;
        if doclet.implements.is_empty() && doclet.mixes.is_empty() {
            return None;
        }
        let key = interface_merge_key(&doclet.longname);
        if self.lookup.contains_key(&key) {
            return None;
        }

        let mut merged = Doclet::new(DocletKind::Interface, doclet.name.clone(), key);
        merged.scope = doclet.scope;
        merged.memberof = doclet.memberof.clone();
        merged.augments = doclet
            .implements
            .iter()
            .chain(&doclet.mixes)
            .cloned()
            .collect();
        Some(self.insert(merged, Some(MergeKind::Interface)))
    }

    /// Move the static members of an interface or mixin to a sibling
    /// namespace, reusing its companion namespace when one exists.
    ///
    /// The namespace is left unplaced; `link` places it next to the
    /// interface.
    fn namespace_merge(&mut self, interface: NodeId, diags: &mut Diagnostics) {
        let longname = self.nodes[interface.0].doclet.longname.clone();
        let statics: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                !node.is_synthetic()
                    && node.doclet.is_static()
                    && node.doclet.memberof.as_deref() == Some(longname.as_str())
            })
            .map(|(idx, _)| NodeId(idx))
            .collect();
        if statics.is_empty() {
            return;
        }

        let key = namespace_merge_key(&longname);
        let namespace = match self.lookup(&key) {
            Some(existing) => existing,
            None => {
                let doclet = &self.nodes[interface.0].doclet;
                let mut merged = Doclet::new(DocletKind::Namespace, doclet.name.clone(), key.clone());
                merged.scope = doclet.scope;
                self.insert(merged, Some(MergeKind::Namespace))
            }
        };

        for child in statics {
            self.nodes[child.0].doclet.memberof = Some(key.clone());
            // Already linked under the interface: move it.
            if self.nodes[child.0].parent == Some(interface) {
                self.detach(interface, child);
                self.attach(namespace, child, diags);
            }
        }
    }

    /// The namespace that holds a node's type-level members.
    ///
    /// Modules and namespaces are their own container. Any other node gets a
    /// namespace-merge node on first request. It goes right after the node
    /// when the node is already placed; otherwise it waits unplaced until
    /// `link` places it before the node.
    fn companion_namespace(&mut self, id: NodeId) -> NodeId {
        let doclet = &self.nodes[id.0].doclet;
        if doclet.kind.is_module_like() {
            return id;
        }
        let key = namespace_merge_key(&doclet.longname);
        if let Some(existing) = self.lookup(&key) {
            return existing;
        }

        let mut companion = Doclet::new(DocletKind::Namespace, doclet.name.clone(), key);
        companion.scope = Some(Scope::Static);
        let namespace = self.insert(companion, Some(MergeKind::Namespace));
        if self.nodes[id.0].placed {
            self.place_after(id, namespace);
        }
        namespace
    }

    fn push_root(&mut self, id: NodeId) {
        if self.nodes[id.0].placed {
            return;
        }
        self.nodes[id.0].placed = true;
        if self.nodes[id.0].is_synthetic() {
            // Roots are ambient declarations.
            self.nodes[id.0].doclet.memberof = None;
        }
        self.roots.push(id);
    }

    /// Place an unplaced node directly after a placed sibling.
    fn place_after(&mut self, anchor: NodeId, id: NodeId) {
        match self.nodes[anchor.0].parent {
            Some(parent) => {
                let siblings = &mut self.nodes[parent.0].children;
                let pos = siblings
                    .iter()
                    .position(|&child| child == anchor)
                    .map_or(siblings.len(), |pos| pos + 1);
                siblings.insert(pos, id);
                let parent_name = self.nodes[parent.0].doclet.longname.clone();
                let node = &mut self.nodes[id.0];
                node.parent = Some(parent);
                node.doclet.memberof = Some(parent_name);
            }
            None => {
                let pos = self
                    .roots
                    .iter()
                    .position(|&root| root == anchor)
                    .map_or(self.roots.len(), |pos| pos + 1);
                self.roots.insert(pos, id);
                self.nodes[id.0].doclet.memberof = None;
            }
        }
        self.nodes[id.0].placed = true;
    }

    /// Attach `child` under `parent`, refusing second parents and cycles.
    fn attach(&mut self, parent: NodeId, child: NodeId, diags: &mut Diagnostics) -> bool {
        if self.nodes[child.0].placed {
            diags.warn(
                WarningKind::CyclicMembership,
                format!(
                    "Doclet '{}' is already placed; not attaching it under '{}'.",
                    self.nodes[child.0].doclet.longname, self.nodes[parent.0].doclet.longname
                ),
            );
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            diags.warn(
                WarningKind::CyclicMembership,
                format!(
                    "Doclet '{}' cannot be a member of its own descendant '{}'.",
                    self.nodes[child.0].doclet.longname, self.nodes[parent.0].doclet.longname
                ),
            );
            return false;
        }

        if self.nodes[child.0].is_synthetic() {
            let parent_name = self.nodes[parent.0].doclet.longname.clone();
            self.nodes[child.0].doclet.memberof = Some(parent_name);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].placed = true;
        self.nodes[parent.0].children.push(child);
        true
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.retain(|&id| id != child);
        self.nodes[child.0].parent = None;
        self.nodes[child.0].placed = false;
    }

    /// Whether `ancestor` is `node` or one of its structural ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }
}
