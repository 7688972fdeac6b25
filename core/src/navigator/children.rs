use super::ChildrenFlight;
use super::Inner;
use super::Navigator;
use super::lock;
use crate::children::ChildrenOutcome;
use crate::error::NavError;
use crate::error::Result;
use futures::FutureExt;
use kbnav_protocol::NodeId;
use kbnav_protocol::is_placeholder_id;
use std::sync::Arc;
use tracing::debug;
use tracing::warn;

impl Navigator {
    /// Loads the child ids and child previews of `id`. Concurrent calls for
    /// the same id share one pair of requests. Each half is stored as soon
    /// as it succeeds; the first failure, if any, is returned.
    pub async fn load_children(&self, id: &str) -> Result<()> {
        if is_placeholder_id(id) {
            return Err(NavError::invalid_target(id));
        }
        let outcome = self.children_flight(id).await;
        match outcome.first_error() {
            Some(err) => Err(NavError::from(err.clone())),
            None => Ok(()),
        }
    }

    fn children_flight(&self, id: &str) -> ChildrenFlight {
        let mut flights = lock(&self.inner.children_flights);
        if let Some(flight) = flights.get(id) {
            debug!(id, "joining in-flight children load");
            return flight.clone();
        }
        let flight = fetch_children(Arc::clone(&self.inner), id.to_string())
            .boxed()
            .shared();
        flights.insert(id.to_string(), flight.clone());
        flight
    }
}

async fn fetch_children(inner: Arc<Inner>, parent: NodeId) -> ChildrenOutcome {
    let (filter, sort) = inner.state().children.query();
    let (ids, previews) = futures::join!(
        inner.service.children(&parent),
        inner.service.preview_children(&parent, filter, sort),
    );

    {
        let mut state = inner.state();
        match &ids {
            Ok(ids) => state.children.store_ids(parent.clone(), ids.clone()),
            Err(err) => warn!(id = %parent, error = %err, "failed to load child ids"),
        }
        match &previews {
            Ok(previews) => state
                .children
                .store_previews(parent.clone(), previews.clone()),
            Err(err) => warn!(id = %parent, error = %err, "failed to load child previews"),
        }
    }
    lock(&inner.children_flights).remove(&parent);

    ChildrenOutcome { ids, previews }
}
