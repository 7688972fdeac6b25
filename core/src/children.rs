use kbnav_protocol::ChildFilter;
use kbnav_protocol::ChildSort;
use kbnav_protocol::NodeId;
use kbnav_protocol::NodeSummary;
use kbnav_protocol::ServiceError;
use std::collections::BTreeMap;

/// Result of one children load. Both halves are fetched independently, so
/// either may fail while the other succeeds.
#[derive(Clone, Debug)]
pub struct ChildrenOutcome {
    pub ids: Result<Vec<NodeId>, ServiceError>,
    pub previews: Result<Vec<NodeSummary>, ServiceError>,
}

impl ChildrenOutcome {
    /// First failure, ids before previews.
    pub fn first_error(&self) -> Option<&ServiceError> {
        self.ids.as_ref().err().or(self.previews.as_ref().err())
    }
}

/// Per-node children as last loaded: the flat id list and the preview
/// listing, stored under the parent id and replaced independently.
#[derive(Clone, Debug, Default)]
pub struct ChildrenStore {
    ids: BTreeMap<NodeId, Vec<NodeId>>,
    previews: BTreeMap<NodeId, Vec<NodeSummary>>,
    filter: ChildFilter,
    sort: ChildSort,
}

impl ChildrenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_ids(&mut self, parent: NodeId, ids: Vec<NodeId>) {
        self.ids.insert(parent, ids);
    }

    pub fn store_previews(&mut self, parent: NodeId, previews: Vec<NodeSummary>) {
        self.previews.insert(parent, previews);
    }

    pub fn ids_of(&self, parent: &str) -> Option<&[NodeId]> {
        self.ids.get(parent).map(Vec::as_slice)
    }

    pub fn previews_of(&self, parent: &str) -> Option<&[NodeSummary]> {
        self.previews.get(parent).map(Vec::as_slice)
    }

    pub fn ids(&self) -> &BTreeMap<NodeId, Vec<NodeId>> {
        &self.ids
    }

    pub fn previews(&self) -> &BTreeMap<NodeId, Vec<NodeSummary>> {
        &self.previews
    }

    pub fn query(&self) -> (ChildFilter, ChildSort) {
        (self.filter, self.sort)
    }

    /// Changes the preview query. Previews loaded under a different query
    /// are dropped; id lists do not depend on it and are kept.
    pub fn set_query(&mut self, filter: ChildFilter, sort: ChildSort) {
        if (filter, sort) != (self.filter, self.sort) {
            self.previews.clear();
        }
        self.filter = filter;
        self.sort = sort;
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.previews.clear();
    }
}
