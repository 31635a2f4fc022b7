//! Immutable post-merge policy registry.

use std::collections::HashMap;

use polygate_core::Handler;

/// The merged name-to-handler table exposed to the request pipeline.
///
/// Built once per loader instance and never mutated afterward, so it can be
/// read concurrently by any number of request workers without
/// synchronization.
pub struct PolicyRegistry {
    policies: HashMap<String, Handler>,
}

impl PolicyRegistry {
    pub(crate) fn new(policies: HashMap<String, Handler>) -> Self {
        Self { policies }
    }

    /// The full table. Same reference on every call; nothing is recomputed.
    pub fn policies(&self) -> &HashMap<String, Handler> {
        &self.policies
    }

    /// Plain lookup. Absence of a name is not an error here; callers decide
    /// how to treat an unknown policy at pipeline-configuration time.
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.policies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Registered names, sorted for stable listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
