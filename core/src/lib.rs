/*!
# kbnav core

Client-side navigation and caching for a knowledge-base browser.

- **Navigation**: resolve a target, show a cached copy at once, fetch the
  live node, confirm the move with the server
- **Node cache**: bounded LRU of previously fetched nodes with their
  breadcrumbs
- **History**: mirror of the server's linear history and cursor, primed in
  the background
- **Modules**: loaded/available modules and the root nodes they contribute
- **Tree state**: expanded nodes and per-node children

## Example

```rust,ignore
use kbnav_backend_client::{ClientOptions, DocumentClient};
use kbnav_core::{Navigator, NavigatorConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = NavigatorConfig::load(None)?;
    let client = DocumentClient::new(ClientOptions {
        base_url: config.base_url.clone(),
        timeout: config.request_timeout(),
    })?;

    let navigator = Navigator::new(Arc::new(client), config);
    navigator.initialize().await?;
    navigator.navigate_to("kb::sec-3").await?;
    println!("{:?}", navigator.breadcrumb());
    Ok(())
}
```
*/

mod cache;
mod children;
mod config;
mod error;
mod expansion;
mod history;
mod navigator;
mod registry;
mod search;

pub use cache::{CacheEntry, CacheStats, DEFAULT_CACHE_CAPACITY, NodeCache};
pub use children::{ChildrenOutcome, ChildrenStore};
pub use config::{BASE_URL_ENV, CONFIG_FILE, HOME_ENV, NavigatorConfig, find_kbnav_home};
pub use error::{ConfigError, ErrorKind, NavError, Result};
pub use expansion::ExpansionSet;
pub use history::{HistoryTracker, HistoryView};
pub use navigator::{
    LastError, LoadingFlags, NavPhase, NavigateOutcome, Navigator, NavigatorSnapshot,
};
pub use registry::{ModuleRegistry, ModuleRoots};
pub use search::SearchState;
