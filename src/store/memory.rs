//! In-memory lock store for testing.

use super::{Handle, LockStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Put { name: String, content: String },
    Resolve { name: String },
    Fetch { handle: String },
}

#[derive(Default)]
struct MemoryState {
    /// Every version ever written, indexed by version number.
    versions: Vec<Vec<u8>>,
    latest: HashMap<String, usize>,
    calls: Vec<StoreCall>,
    failing_resolves: usize,
    failing_puts: bool,
}

/// Versioned in-memory store with call recording and failure injection.
///
/// Clones share state, so a test can keep one clone for inspection while the
/// engine owns another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Write `content` under `name` without recording a call.
    pub fn seed(&self, name: &str, content: &str) -> Handle {
        let mut state = self.state();
        state.versions.push(content.as_bytes().to_vec());
        let version = state.versions.len() - 1;
        state.latest.insert(name.to_string(), version);
        handle_for(name, version)
    }

    /// Latest content under `name`, if any.
    pub fn content(&self, name: &str) -> Option<String> {
        let state = self.state();
        let version = *state.latest.get(name)?;
        Some(String::from_utf8_lossy(&state.versions[version]).into_owned())
    }

    /// Make the next `count` resolves fail with an I/O error.
    pub fn fail_resolves(&self, count: usize) {
        self.state().failing_resolves = count;
    }

    /// Make every put fail with an I/O error.
    pub fn fail_puts(&self) {
        self.state().failing_puts = true;
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Contents of every recorded put, in order.
    pub fn puts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Put { content, .. } => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn resolve_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Resolve { .. }))
            .count()
    }
}

fn handle_for(name: &str, version: usize) -> Handle {
    Handle::new(format!("{}#{}", name, version))
}

impl LockStore for MemoryStore {
    fn put(&self, name: &str, content: &[u8]) -> Result<Handle, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::Put {
            name: name.to_string(),
            content: String::from_utf8_lossy(content).into_owned(),
        });
        if state.failing_puts {
            return Err(StoreError::Io("injected put failure".to_string()));
        }
        state.versions.push(content.to_vec());
        let version = state.versions.len() - 1;
        state.latest.insert(name.to_string(), version);
        Ok(handle_for(name, version))
    }

    fn resolve(&self, name: &str) -> Result<Handle, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::Resolve {
            name: name.to_string(),
        });
        if state.failing_resolves > 0 {
            state.failing_resolves -= 1;
            return Err(StoreError::Io("injected resolve failure".to_string()));
        }
        state
            .latest
            .get(name)
            .map(|&version| handle_for(name, version))
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn fetch(&self, handle: &Handle) -> Result<Vec<u8>, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::Fetch {
            handle: handle.to_string(),
        });
        handle
            .as_str()
            .rsplit_once('#')
            .and_then(|(_, version)| version.parse::<usize>().ok())
            .and_then(|version| state.versions.get(version).cloned())
            .ok_or_else(|| StoreError::NotFound(handle.to_string()))
    }
}
