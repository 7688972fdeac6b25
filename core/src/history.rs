use kbnav_protocol::HistorySnapshot;
use kbnav_protocol::NodeId;
use serde::Serialize;
use tracing::warn;

/// Local mirror of the server's linear navigation history.
///
/// Never computed locally: every mutation adopts what the server reported.
/// The cursor is either a valid index into `items` or absent when `items`
/// is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryTracker {
    items: Vec<NodeId>,
    cursor: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub items: Vec<NodeId>,
    pub cursor: i64,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale replacement from a history query.
    pub fn replace(&mut self, snapshot: HistorySnapshot) {
        self.items = snapshot.items;
        self.cursor = None;
        self.set_cursor(snapshot.cursor);
    }

    /// Adopts only the cursor, keeping the item list as is.
    pub fn set_cursor(&mut self, cursor: i64) {
        self.cursor = normalize_cursor(cursor, self.items.len());
    }

    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.cursor.and_then(|index| self.items.get(index))
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.cursor, Some(index) if index > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.cursor, Some(index) if index + 1 < self.items.len())
    }

    pub fn snapshot(&self) -> HistoryView {
        HistoryView {
            items: self.items.clone(),
            cursor: self.cursor.map_or(-1, |index| index as i64),
        }
    }
}

fn normalize_cursor(cursor: i64, len: usize) -> Option<usize> {
    if len == 0 || cursor < 0 {
        return None;
    }
    let index = usize::try_from(cursor).unwrap_or(usize::MAX);
    if index >= len {
        warn!(cursor, len, "history cursor past the end; clamping to last item");
        return Some(len - 1);
    }
    Some(index)
}
