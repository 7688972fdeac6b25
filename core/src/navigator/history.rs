use super::Inner;
use super::Loading;
use super::Navigator;
use super::navigate::NavigateOutcome;
use crate::cache::CacheEntry;
use crate::error::Result;
use kbnav_protocol::DetailRequest;
use kbnav_protocol::Located;
use kbnav_protocol::NodeId;
use kbnav_protocol::ServiceResult;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug)]
enum Movement {
    Back(u32),
    Forward(u32),
    Up(u32),
}

impl Movement {
    fn operation(self) -> &'static str {
        match self {
            Movement::Back(_) => "move back",
            Movement::Forward(_) => "move forward",
            Movement::Up(_) => "move up",
        }
    }
}

impl Navigator {
    pub async fn move_back(&self, steps: u32) -> Result<NavigateOutcome> {
        self.move_cursor(Movement::Back(steps)).await
    }

    pub async fn move_forward(&self, steps: u32) -> Result<NavigateOutcome> {
        self.move_cursor(Movement::Forward(steps)).await
    }

    pub async fn move_up(&self, levels: u32) -> Result<NavigateOutcome> {
        self.move_cursor(Movement::Up(levels)).await
    }

    async fn move_cursor(&self, movement: Movement) -> Result<NavigateOutcome> {
        let ticket = self.inner.begin_intent();
        let _loading = self.loading_guard(Loading::Navigation);
        let result = self.move_cursor_inner(movement, ticket).await;
        self.settle(movement.operation(), result)
    }

    async fn move_cursor_inner(&self, movement: Movement, ticket: u64) -> Result<NavigateOutcome> {
        let located: ServiceResult<Located> = match movement {
            Movement::Back(steps) => self.inner.service.back(steps.max(1)).await,
            Movement::Forward(steps) => self.inner.service.forward(steps.max(1)).await,
            Movement::Up(levels) => self.inner.service.up(levels.max(1)).await,
        };
        let located = located?;
        let id = located.node.id.clone();
        if !self
            .inner
            .publish(ticket, located.node, Some(located.breadcrumb))
        {
            return Ok(NavigateOutcome::Superseded);
        }

        let snapshot = self.inner.service.history().await?;
        let mut state = self.inner.state();
        if snapshot.items.len() == state.history.items().len() {
            state.history.set_cursor(snapshot.cursor);
        } else {
            // `up` can append to server history; adopt the new list rather
            // than point the cursor past the local one.
            debug!(
                local = state.history.items().len(),
                remote = snapshot.items.len(),
                "history length changed; replacing"
            );
            state.history.replace(snapshot);
        }
        Ok(NavigateOutcome::Navigated(id))
    }

    /// Replaces items and cursor from the server, then starts background
    /// fetches for history items that are not cached yet.
    pub async fn refresh_history(&self) -> Result<()> {
        let snapshot = self.inner.service.history().await?;
        let missing: Vec<NodeId> = {
            let mut state = self.inner.state();
            state.history.replace(snapshot);
            if !self.inner.config.prime_history {
                return Ok(());
            }
            let candidates: Vec<NodeId> = state
                .history
                .items()
                .iter()
                .filter(|id| !state.cache.contains(id) && !state.priming.contains(*id))
                .cloned()
                .collect();
            for id in &candidates {
                state.priming.insert(id.clone());
            }
            candidates
        };
        for id in missing {
            tokio::spawn(prime_history_item(Arc::clone(&self.inner), id));
        }
        Ok(())
    }
}

/// Best-effort shallow fetch of one history item. Never replaces an entry
/// that a full fetch wrote in the meantime.
async fn prime_history_item(inner: Arc<Inner>, id: NodeId) {
    match inner.service.node_detail(&id, &DetailRequest::shallow()).await {
        Ok(view) => {
            let mut state = inner.state();
            state.cache.put_if_absent(
                id.clone(),
                CacheEntry {
                    node: view.into_node(),
                    breadcrumb: Vec::new(),
                },
            );
            state.priming.remove(&id);
        }
        Err(err) => {
            debug!(id, error = %err, "history priming failed");
            inner.state().priming.remove(&id);
        }
    }
}
