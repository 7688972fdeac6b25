use super::Loading;
use super::NavPhase;
use super::Navigator;
use crate::cache::CacheEntry;
use crate::error::NavError;
use crate::error::Result;
use kbnav_protocol::DetailRequest;
use kbnav_protocol::NodeId;
use kbnav_protocol::NodeRecord;
use kbnav_protocol::Resolution;
use kbnav_protocol::is_placeholder_id;
use serde::Serialize;
use tracing::debug;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "id", rename_all = "snake_case")]
pub enum NavigateOutcome {
    Navigated(NodeId),
    /// The server cursor was already on the node; breadcrumb, history and
    /// modules were left alone.
    AlreadyAtTarget(NodeId),
    /// A newer navigation started before this one could commit.
    Superseded,
}

impl Navigator {
    /// Resolves `target`, shows the cached copy if there is one, fetches the
    /// full node, confirms the move with the server and caches the result.
    pub async fn navigate_to(&self, target: &str) -> Result<NavigateOutcome> {
        if is_placeholder_id(target) {
            debug!(target, "ignoring placeholder navigation target");
            return Err(NavError::invalid_target(target));
        }
        let ticket = self.inner.begin_navigation();
        let _loading = self.loading_guard(Loading::Navigation);
        let _phase = self.phase_guard(ticket);
        let result = self.navigate_inner(target, ticket).await;
        if matches!(result, Ok(NavigateOutcome::Superseded)) {
            debug!(target, ticket, "navigation superseded");
        }
        self.settle("navigate", result)
    }

    async fn navigate_inner(&self, target: &str, ticket: u64) -> Result<NavigateOutcome> {
        let epoch = self.inner.state().registry.epoch();

        self.inner.set_phase(ticket, NavPhase::Resolving);
        let reply = self.inner.service.resolve(target).await?;
        let id = match reply.into_resolution() {
            Resolution::Resolved(id) => id,
            Resolution::Ambiguous { candidates } => {
                return Err(NavError::Ambiguous {
                    target: target.to_string(),
                    candidates,
                });
            }
            Resolution::NotFound => {
                return Err(NavError::NotFound {
                    target: target.to_string(),
                });
            }
        };

        let (view, format, shown_breadcrumb) = {
            let mut state = self.inner.state();
            if !self.inner.is_latest(ticket) {
                return Ok(NavigateOutcome::Superseded);
            }
            let shown_breadcrumb = state.breadcrumb.clone();
            if let Some(entry) = state.cache.get(&id).cloned() {
                debug!(id, "showing cached node while fetching");
                state.current = Some(entry.node);
                state.breadcrumb = entry.breadcrumb;
            }
            state.phase = NavPhase::Fetching;
            (state.view, state.format, shown_breadcrumb)
        };

        let node = self
            .inner
            .service
            .node_detail(&id, &DetailRequest::full(&view, format))
            .await?
            .into_node();
        if !self.inner.publish(ticket, node.clone(), None) {
            return Ok(NavigateOutcome::Superseded);
        }

        self.inner.set_phase(ticket, NavPhase::Confirming);
        self.ensure_module_loaded(&node, epoch)?;
        let reply = self.inner.service.navigate(&id).await?;
        self.ensure_module_loaded(&node, epoch)?;
        if !self.inner.is_latest(ticket) {
            return Ok(NavigateOutcome::Superseded);
        }

        if reply.already_at_target {
            // The optimistic publish may have shown a cached breadcrumb;
            // staying put keeps the one that was on screen.
            self.inner.state().breadcrumb = shown_breadcrumb;
        } else {
            self.inner.state().breadcrumb = reply.breadcrumb;
            self.refresh_registry().await?;
            self.refresh_history().await?;
            if !self.inner.is_latest(ticket) {
                return Ok(NavigateOutcome::Superseded);
            }
        }

        let breadcrumb = self.inner.state().breadcrumb.clone();
        self.inner.state().cache.put(
            id.clone(),
            CacheEntry {
                node: node.clone(),
                breadcrumb,
            },
        );

        if node.is_expandable()
            && let Err(err) = self.load_children(&id).await
        {
            debug!(id, error = %err, "children not loaded after navigation");
        }

        info!(id, already_at_target = reply.already_at_target, "navigated");
        Ok(if reply.already_at_target {
            NavigateOutcome::AlreadyAtTarget(id)
        } else {
            NavigateOutcome::Navigated(id)
        })
    }

    /// Fails when the node's module was unloaded or purged after `epoch`.
    fn ensure_module_loaded(&self, node: &NodeRecord, epoch: u64) -> Result<()> {
        let Some(module) = node.module_id.as_deref() else {
            return Ok(());
        };
        if self.inner.state().registry.dropped_since(module, epoch) {
            return Err(NavError::ModuleNotLoaded {
                module: module.to_string(),
                id: node.id.clone(),
            });
        }
        Ok(())
    }

    /// Adopts the server's current node and breadcrumb, refreshes history,
    /// then re-fetches the node with the active view options.
    pub async fn load_current_node(&self) -> Result<NavigateOutcome> {
        let ticket = self.inner.begin_intent();
        let _loading = self.loading_guard(Loading::Navigation);
        let result = self.load_current_inner(ticket).await;
        self.settle("load current node", result)
    }

    async fn load_current_inner(&self, ticket: u64) -> Result<NavigateOutcome> {
        let located = self.inner.service.current_node().await?;
        let id = located.node.id.clone();
        if is_placeholder_id(&id) {
            return Err(NavError::NotFound {
                target: "current".to_string(),
            });
        }
        if !self
            .inner
            .publish(ticket, located.node, Some(located.breadcrumb))
        {
            return Ok(NavigateOutcome::Superseded);
        }

        self.refresh_history().await?;

        let (view, format) = {
            let state = self.inner.state();
            (state.view, state.format)
        };
        let node = self
            .inner
            .service
            .node_detail(&id, &DetailRequest::full(&view, format))
            .await?
            .into_node();
        let breadcrumb = {
            let mut state = self.inner.state();
            if !self.inner.is_latest(ticket) {
                return Ok(NavigateOutcome::Superseded);
            }
            state.current = Some(node.clone());
            let breadcrumb = state.breadcrumb.clone();
            state.cache.put(
                id.clone(),
                CacheEntry {
                    node: node.clone(),
                    breadcrumb: breadcrumb.clone(),
                },
            );
            breadcrumb
        };
        debug!(id, crumbs = breadcrumb.len(), "current node loaded");

        if node.is_expandable()
            && let Err(err) = self.load_children(&id).await
        {
            debug!(id, error = %err, "children not loaded for current node");
        }
        Ok(NavigateOutcome::Navigated(id))
    }

    /// Re-fetches the current node with the active view options and content
    /// format. Does nothing without a current node; the result is dropped if
    /// the user has moved on in the meantime.
    pub async fn fetch_node_view(&self) -> Result<()> {
        let (id, view, format, seen) = {
            let state = self.inner.state();
            let Some(current) = &state.current else {
                return Ok(());
            };
            (
                current.id.clone(),
                state.view,
                state.format,
                self.inner.latest_intent(),
            )
        };
        let result = self
            .inner
            .service
            .node_detail(&id, &DetailRequest::full(&view, format))
            .await
            .map_err(NavError::from);
        let node = self.settle("fetch node view", result)?.into_node();

        let mut state = self.inner.state();
        let unchanged = state
            .current
            .as_ref()
            .is_some_and(|current| current.id == id);
        if !unchanged || !self.inner.is_latest(seen) {
            debug!(id, "dropping node view for a node that is no longer current");
            return Ok(());
        }
        state.current = Some(node.clone());
        let breadcrumb = state.breadcrumb.clone();
        state.cache.put(id, CacheEntry { node, breadcrumb });
        Ok(())
    }
}
