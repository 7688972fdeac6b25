use super::Loading;
use super::Navigator;
use crate::error::Result;
use kbnav_protocol::SearchScope;
use tracing::debug;
use tracing::warn;

impl Navigator {
    /// Runs a search with the stored flags and the configured result limit.
    /// Query, scope and results are committed together once the server
    /// answers. A failed search is logged and leaves the visible search
    /// untouched.
    pub async fn perform_search(&self, query: &str, scope: SearchScope) -> Result<()> {
        if query.trim().is_empty() {
            self.clear_search();
            return Ok(());
        }
        let (generation, options) = {
            let mut state = self.inner.state();
            state.search_generation += 1;
            let mut options = state.search.options(self.inner.config.search_max_results);
            options.scope = scope;
            (state.search_generation, options)
        };
        let _loading = self.loading_guard(Loading::Search);
        let hits = match self.inner.service.search(query, &options).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(query, error = %err, "search failed");
                return Ok(());
            }
        };

        let mut state = self.inner.state();
        if state.search_generation != generation {
            debug!(query, "dropping results of a replaced search");
            return Ok(());
        }
        debug!(query, hits = hits.len(), "search finished");
        state.search.query = query.to_string();
        state.search.scope = scope;
        state.search.results = hits;
        Ok(())
    }

    pub fn clear_search(&self) {
        let mut state = self.inner.state();
        state.search_generation += 1;
        state.search.clear();
    }

    pub fn set_whole_word(&self, enabled: bool) {
        self.inner.state().search.whole_word = enabled;
    }

    pub fn set_case_sensitive(&self, enabled: bool) {
        self.inner.state().search.case_sensitive = enabled;
    }

    pub fn set_use_regex(&self, enabled: bool) {
        self.inner.state().search.use_regex = enabled;
    }
}
