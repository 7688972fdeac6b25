use kbnav_protocol::ModuleListing;
use kbnav_protocol::ModuleRecord;
use kbnav_protocol::NodeRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::debug;

/// Root node(s) a module contributes. Consumers branch on the shape, so a
/// module's first root is kept as `Single` and only a second root promotes
/// the entry to `Many`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleRoots {
    Single(NodeRecord),
    Many(Vec<NodeRecord>),
}

impl ModuleRoots {
    fn push(&mut self, root: NodeRecord) {
        match self {
            ModuleRoots::Many(roots) => roots.push(root),
            ModuleRoots::Single(_) => {
                let previous = std::mem::replace(self, ModuleRoots::Many(Vec::with_capacity(2)));
                if let (ModuleRoots::Single(first), ModuleRoots::Many(roots)) = (previous, self) {
                    roots.push(first);
                    roots.push(root);
                }
            }
        }
    }

    pub fn as_slice(&self) -> &[NodeRecord] {
        match self {
            ModuleRoots::Single(root) => std::slice::from_ref(root),
            ModuleRoots::Many(roots) => roots,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Which document modules exist, which are loaded, and the roots each loaded
/// module contributes.
#[derive(Clone, Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleRecord>,
    available: Vec<String>,
    loaded: Vec<String>,
    roots: BTreeMap<String, ModuleRoots>,
    /// Bumped on every unload or purge.
    epoch: u64,
    /// Module name -> epoch at which it was last dropped. Cleared on load.
    dropped_at: HashMap<String, u64>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_listing(&mut self, listing: ModuleListing) {
        self.modules = listing.modules;
        self.available = listing.available_modules;
        self.loaded = listing.loaded_modules;
    }

    /// Rebuilds the root map from the server's flat root list. Roots without
    /// a module, or whose module is not in the loaded set, are skipped.
    pub fn apply_roots(&mut self, roots: Vec<NodeRecord>) {
        self.roots.clear();
        for root in roots {
            let Some(module) = root.module_id.clone() else {
                debug!(root = %root.id, "skipping root without owning module");
                continue;
            };
            if !self.is_loaded(&module) {
                debug!(root = %root.id, module, "skipping root of a module that is not loaded");
                continue;
            }
            match self.roots.get_mut(&module) {
                Some(existing) => existing.push(root),
                None => {
                    self.roots.insert(module, ModuleRoots::Single(root));
                }
            }
        }
    }

    /// Local bookkeeping for a successful load, ahead of the next listing.
    pub fn note_loaded(&mut self, name: &str) {
        self.dropped_at.remove(name);
        if !self.is_loaded(name) {
            self.loaded.push(name.to_string());
        }
    }

    /// Drops the module's roots and loaded flag immediately, before any
    /// refresh has been issued.
    pub fn remove_roots(&mut self, name: &str) {
        self.epoch += 1;
        self.roots.remove(name);
        self.loaded.retain(|loaded| loaded != name);
        self.dropped_at.insert(name.to_string(), self.epoch);
    }

    pub fn clear_roots(&mut self) {
        self.epoch += 1;
        let mut dropped: Vec<String> = self.loaded.drain(..).collect();
        dropped.extend(self.roots.keys().cloned());
        for name in dropped {
            self.dropped_at.insert(name, self.epoch);
        }
        self.roots.clear();
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True when `module` was unloaded or purged after `epoch` and has not
    /// been loaded again since.
    pub fn dropped_since(&self, module: &str, epoch: u64) -> bool {
        self.dropped_at
            .get(module)
            .is_some_and(|dropped| *dropped > epoch)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.iter().any(|loaded| loaded == name)
    }

    pub fn modules(&self) -> &[ModuleRecord] {
        &self.modules
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    pub fn roots(&self) -> &BTreeMap<String, ModuleRoots> {
        &self.roots
    }

    pub fn roots_of(&self, module: &str) -> Option<&ModuleRoots> {
        self.roots.get(module)
    }
}
