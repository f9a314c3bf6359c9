//! Extension registry
//!
//! Declares which node and mark kinds exist in a deployment. The Markdown rule tables, the
//! serializer and the HTML collaborator are all built from one [`Extensions`] value: a kind that
//! is not declared has no parse rule, and a declared kind without a renderer is rejected when a
//! serializer is constructed.

use crate::markup::{MarkKind, NodeKind};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    nodes: BTreeSet<NodeKind>,
    marks: BTreeSet<MarkKind>,
}

impl Extensions {
    /// No kinds at all
    pub fn empty() -> Self {
        Extensions {
            nodes: BTreeSet::new(),
            marks: BTreeSet::new(),
        }
    }

    /// Every builtin node and mark kind
    pub fn all() -> Self {
        Extensions {
            nodes: NodeKind::BUILTIN.iter().cloned().collect(),
            marks: MarkKind::BUILTIN.iter().cloned().collect(),
        }
    }

    pub fn with_node(mut self, kind: NodeKind) -> Self {
        self.nodes.insert(kind);
        self
    }

    pub fn without_node(mut self, kind: &NodeKind) -> Self {
        self.nodes.remove(kind);
        self
    }

    pub fn with_mark(mut self, kind: MarkKind) -> Self {
        self.marks.insert(kind);
        self
    }

    pub fn without_mark(mut self, kind: &MarkKind) -> Self {
        self.marks.remove(kind);
        self
    }

    pub fn has_node(&self, kind: &NodeKind) -> bool {
        self.nodes.contains(kind)
    }

    pub fn has_mark(&self, kind: &MarkKind) -> bool {
        self.marks.contains(kind)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeKind> {
        self.nodes.iter()
    }

    pub fn marks(&self) -> impl Iterator<Item = &MarkKind> {
        self.marks.iter()
    }

    /// Whether checkbox list items should be recognized in Markdown bullet lists
    pub fn has_todo_lists(&self) -> bool {
        self.has_node(&NodeKind::TodoList) && self.has_node(&NodeKind::TodoItem)
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self::all()
    }
}
