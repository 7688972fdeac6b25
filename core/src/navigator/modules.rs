use super::Loading;
use super::Navigator;
use crate::error::Result;
use tracing::info;
use tracing::warn;

impl Navigator {
    /// Refreshes the module listing and then the root map. A root-map
    /// failure is logged and leaves the previous roots in place.
    pub async fn list_modules(&self) -> Result<()> {
        let _loading = self.loading_guard(Loading::Modules);
        let result = self.refresh_registry().await;
        self.settle("list modules", result)
    }

    pub async fn load_module(&self, name: &str) -> Result<()> {
        let _loading = self.loading_guard(Loading::Modules);
        let result: Result<()> = async {
            self.inner.service.load_module(name).await?;
            self.inner.state().registry.note_loaded(name);
            info!(module = name, "module loaded");
            self.after_module_change().await
        }
        .await;
        self.settle("load module", result)
    }

    /// The module's roots disappear as soon as the server confirms the
    /// unload, before the listing is refreshed.
    pub async fn unload_module(&self, name: &str) -> Result<()> {
        let _loading = self.loading_guard(Loading::Modules);
        let result: Result<()> = async {
            self.inner.service.unload_module(name).await?;
            self.inner.state().registry.remove_roots(name);
            info!(module = name, "module unloaded");
            self.after_module_change().await
        }
        .await;
        self.settle("unload module", result)
    }

    pub async fn purge_modules(&self) -> Result<()> {
        let _loading = self.loading_guard(Loading::Modules);
        let result: Result<()> = async {
            self.inner.service.purge_modules().await?;
            self.inner.state().registry.clear_roots();
            info!("all modules purged");
            self.after_module_change().await
        }
        .await;
        self.settle("purge modules", result)
    }

    /// Rebuilds the root map from the server's loaded roots.
    pub async fn refresh_roots(&self) -> Result<()> {
        let roots = self.inner.service.loaded_roots().await?;
        self.inner.state().registry.apply_roots(roots);
        Ok(())
    }

    pub(super) async fn refresh_registry(&self) -> Result<()> {
        let listing = self.inner.service.list_modules().await?;
        self.inner.state().registry.apply_listing(listing);
        if let Err(err) = self.refresh_roots().await {
            warn!(error = %err, "failed to refresh module roots");
        }
        Ok(())
    }

    /// The mutation already succeeded on the server; a current node that
    /// can no longer be loaded (nothing loaded after a purge) is only logged.
    async fn after_module_change(&self) -> Result<()> {
        self.refresh_registry().await?;
        if let Err(err) = self.load_current_node().await {
            warn!(error = %err, "current node not reloaded after module change");
        }
        Ok(())
    }
}
