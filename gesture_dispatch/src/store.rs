//! Where the dispatch policy lives between sessions.
//!
//! A store holds one JSON document under [`POLICY_NAMESPACE`].  Loading
//! merges whatever it finds over [`GesturePolicy::default`]; anything
//! unreadable is treated as absent.  Saving always writes the whole policy.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::policy::{GesturePolicy, PolicyPatch};

/// Fixed key the policy document is stored under.
pub const POLICY_NAMESPACE: &str = "gestureControllerSettings";

// ════════════════════════════════════════════════════════════════════════════
// PolicyStore
// ════════════════════════════════════════════════════════════════════════════

/// A key-value slot for the serialized policy.
pub trait PolicyStore: Send {
    /// The stored document, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, document: &str) -> Result<()>;
}

/// Read the stored policy, falling back to defaults on any problem.
pub fn load_policy(store: &dyn PolicyStore) -> GesturePolicy {
    let document = match store.load() {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            debug!("no stored gesture policy, using defaults");
            return GesturePolicy::default();
        }
        Err(e) => {
            warn!("could not read gesture policy ({:#}), using defaults", e);
            return GesturePolicy::default();
        }
    };

    match serde_json::from_str::<PolicyPatch>(&document) {
        Ok(patch) => GesturePolicy::default().merged(patch),
        Err(e) => {
            warn!("stored gesture policy is malformed ({}), using defaults", e);
            GesturePolicy::default()
        }
    }
}

/// Write the whole policy.
pub fn save_policy(store: &dyn PolicyStore, policy: &GesturePolicy) -> Result<()> {
    let document = serde_json::to_string(policy).context("serializing gesture policy")?;
    store.save(&document)
}

// ════════════════════════════════════════════════════════════════════════════
// MemoryStore
// ════════════════════════════════════════════════════════════════════════════

/// In-process store.  Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        MemoryStore { slot: Arc::new(Mutex::new(Some(document.into()))) }
    }

    /// Current contents, for inspection.
    pub fn document(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|s| s.clone())
    }
}

impl PolicyStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        let slot = self.slot.lock().map_err(|_| anyhow::anyhow!("policy slot poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, document: &str) -> Result<()> {
        let mut slot = self.slot.lock().map_err(|_| anyhow::anyhow!("policy slot poisoned"))?;
        *slot = Some(document.to_string());
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonFileStore
// ════════════════════════════════════════════════════════════════════════════

/// One `<namespace>.json` file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// `<config dir>/gesture_player/gestureControllerSettings.json`, or the
    /// working directory when the platform has no config directory.
    pub fn in_config_dir() -> Self {
        let file = format!("{}.json", POLICY_NAMESPACE);
        let path = dirs::config_dir()
            .map(|d| d.join("gesture_player").join(&file))
            .unwrap_or_else(|| PathBuf::from(file));
        JsonFileStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PolicyStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn save(&self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        fs::write(&self.path, document)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
