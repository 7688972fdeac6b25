use kbnav_protocol::NodeId;
use kbnav_protocol::ROOT_SENTINEL;
use kbnav_protocol::is_placeholder_id;
use std::collections::BTreeSet;

/// Nodes currently expanded in the tree view. Starts with the top-level
/// container expanded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionSet {
    expanded: BTreeSet<NodeId>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self {
            expanded: BTreeSet::from([ROOT_SENTINEL.to_string()]),
        }
    }

    /// Flips membership of `id`. Placeholder ids are ignored. Returns whether
    /// the node is expanded afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if is_placeholder_id(id) {
            return false;
        }
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.expanded.iter()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

impl Default for ExpansionSet {
    fn default() -> Self {
        Self::new()
    }
}
