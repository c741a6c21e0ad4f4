//! Minimal read of `packages.lock.json` for rationale text.
//!
//! Only the package-to-resolved-version mapping is extracted; everything else
//! in the lock file is irrelevant to the change signal.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct LockFile {
    #[serde(default)]
    dependencies: BTreeMap<String, BTreeMap<String, LockEntry>>,
}

#[derive(Debug, Deserialize)]
struct LockEntry {
    #[serde(default)]
    resolved: Option<String>,
}

/// Flatten a lock file into package -> resolved version, across all target
/// frameworks. `None` when the bytes are not a readable lock file.
pub fn locked_versions(bytes: &[u8]) -> Option<BTreeMap<String, String>> {
    let lock: LockFile = serde_json::from_slice(bytes).ok()?;

    let mut versions = BTreeMap::new();
    for packages in lock.dependencies.values() {
        for (name, entry) in packages {
            if let Some(resolved) = &entry.resolved {
                versions.insert(name.clone(), resolved.clone());
            }
        }
    }
    Some(versions)
}

/// Human-readable package deltas between two lock snapshots
pub fn version_deltas(
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut deltas = Vec::new();

    for (name, new_version) in new {
        match old.get(name) {
            None => deltas.push(format!("+{} {}", name, new_version)),
            Some(old_version) if old_version != new_version => {
                deltas.push(format!("{} {} -> {}", name, old_version, new_version))
            }
            Some(_) => {}
        }
    }

    for name in old.keys() {
        if !new.contains_key(name) {
            deltas.push(format!("-{}", name));
        }
    }

    deltas
}
