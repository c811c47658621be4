//! Per-repository exclusive locks.
//!
//! Every operation that touches a mirror's working copy (sync, checkout,
//! context assembly, raw reads, commit rendering) runs inside
//! `LockRegistry::with_lock` for that mirror's name. Gates are created on
//! first use and live until the process exits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
pub struct LockRegistry {
    gates: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the gate for `name` in one step under the registry guard.
    fn gate(&self, name: &str) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(gates.entry(name.to_string()).or_default())
    }

    /// Run `f` while holding exclusive access to `name`.
    ///
    /// Blocks without timeout until the current holder finishes. The lock is
    /// released when `f` returns or unwinds.
    pub fn with_lock<F, T>(&self, name: &str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let gate = self.gate(name);
        let _guard = match gate.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // The previous holder panicked; the mirror on disk is still usable.
                tracing::warn!(repository = %name, "recovering lock poisoned by a panicked holder");
                poisoned.into_inner()
            }
        };
        f()
    }

    /// Number of names seen so far.
    pub fn len(&self) -> usize {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
