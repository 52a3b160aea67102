use crate::NodeId;

/// What changed on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Children were added to or removed from the target.
    ChildList,
    /// An attribute (including `class`) changed on the target.
    Attribute(String),
    /// An inline style property changed on the target.
    Style(String),
    /// A live property (`checked`, `value`) changed on the target.
    Property(&'static str),
}

/// One entry of the document mutation journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub kind: MutationKind,
}

impl MutationRecord {
    pub fn new(target: NodeId, kind: MutationKind) -> Self {
        Self { target, kind }
    }

    pub fn is_child_list(&self) -> bool {
        matches!(self.kind, MutationKind::ChildList)
    }
}
