use anyhow::Result;

use crate::config;
use crate::registry::{Hive, KeyStore};

/// Whether a Java runtime is registered on this machine. Read-only; the
/// caller aborts the whole run when this is false.
pub fn runtime_present(store: &impl KeyStore) -> Result<bool> {
    store.exists(Hive::LocalMachine, config::JAVA_RUNTIME_KEY)
}
