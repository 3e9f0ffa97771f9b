//! Session partition registry
//!
//! A partition is a named storage scope (cookies, local storage, cache).
//! Every surface that must see the target site's login state binds to the
//! same partition name; storage behind a `persist:` name survives relaunches.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_PARTITION: &str = "persist:linkedin";

const PERSISTENT_PREFIX: &str = "persist:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionPurpose {
    /// Authenticated session with the embedded target site
    TargetSite,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionHandle {
    name: String,
}

impl PartitionHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_persistent(&self) -> bool {
        self.name.starts_with(PERSISTENT_PREFIX)
    }

    /// Filesystem-safe key for the partition's storage directory
    pub fn storage_key(&self) -> String {
        let bare = self
            .name
            .strip_prefix(PERSISTENT_PREFIX)
            .unwrap_or(&self.name);

        let mut safe = String::with_capacity(bare.len());
        for ch in bare.chars() {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
                safe.push(ch.to_ascii_lowercase());
            } else {
                safe.push('_');
            }
        }

        if safe.is_empty() {
            safe.push_str("default");
        }
        safe
    }
}

impl std::fmt::Display for PartitionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Maps fixed purposes to partition names and remembers which partitions
/// already had their storage provisioned.
pub struct PartitionRegistry {
    target_site: PartitionHandle,
    provisioned: Arc<RwLock<HashSet<String>>>,
}

impl PartitionRegistry {
    pub fn new(target_site_partition: impl Into<String>) -> Self {
        Self {
            target_site: PartitionHandle::new(target_site_partition),
            provisioned: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Always the same handle for the same purpose
    pub fn partition_for(&self, purpose: PartitionPurpose) -> PartitionHandle {
        match purpose {
            PartitionPurpose::TargetSite => self.target_site.clone(),
        }
    }

    /// Record that a surface is binding to `handle`.
    ///
    /// Returns true exactly once per partition, when storage needs
    /// provisioning.
    pub fn mark_bound(&self, handle: &PartitionHandle) -> bool {
        let inserted = self.provisioned.write().insert(handle.name.clone());
        if inserted {
            tracing::info!(
                partition = %handle,
                persistent = handle.is_persistent(),
                "Provisioning session partition"
            );
        }
        inserted
    }

    /// Undo a `mark_bound` whose provisioning failed
    pub fn forget(&self, handle: &PartitionHandle) {
        self.provisioned.write().remove(&handle.name);
    }

    pub fn is_provisioned(&self, handle: &PartitionHandle) -> bool {
        self.provisioned.read().contains(&handle.name)
    }
}

impl Default for PartitionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PARTITION)
    }
}

impl Clone for PartitionRegistry {
    fn clone(&self) -> Self {
        Self {
            target_site: self.target_site.clone(),
            provisioned: Arc::clone(&self.provisioned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_for_is_stable() {
        let registry = PartitionRegistry::default();
        let a = registry.partition_for(PartitionPurpose::TargetSite);
        let b = registry.partition_for(PartitionPurpose::TargetSite);
        assert_eq!(a, b);
        assert_eq!(a.name(), "persist:linkedin");
        assert!(a.is_persistent());
    }

    #[test]
    fn test_mark_bound_once() {
        let registry = PartitionRegistry::default();
        let clone = registry.clone();
        let handle = registry.partition_for(PartitionPurpose::TargetSite);

        assert!(!registry.is_provisioned(&handle));
        assert!(registry.mark_bound(&handle));
        assert!(!clone.mark_bound(&handle));
        assert!(registry.is_provisioned(&handle));

        registry.forget(&handle);
        assert!(clone.mark_bound(&handle));
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(PartitionHandle::new("persist:linkedin").storage_key(), "linkedin");
        assert_eq!(PartitionHandle::new("persist:My Work/1").storage_key(), "my_work_1");
        assert_eq!(PartitionHandle::new("persist:").storage_key(), "default");
        assert!(!PartitionHandle::new("scratch").is_persistent());
    }
}
