//! Policy loader: path resolution, definition scanning, registry merging.
//!
//! Loading is a one-shot, synchronous construction step performed at process
//! startup (or test setup). Every loader error is fatal to construction and
//! surfaces synchronously; a misconfigured path is a configuration defect,
//! not a transient condition, so there is no retry and no partial registry.

pub mod merger;
pub mod paths;
pub mod registry;
pub mod scanner;

use std::collections::HashMap;
use std::path::PathBuf;

use polygate_core::{Handler, Result};

use crate::catalog::HandlerCatalog;

pub use paths::{builtin_policies_dir, ResolutionEnv, SearchPath, CONFIG_PATH_VAR, POLICIES_SUBDIR};
pub use registry::PolicyRegistry;
pub use scanner::PolicyDefinition;

/// Loader construction options.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// When true (the default), a later search-path entry's definition for a
    /// name replaces an earlier one. When false, the first-seen definition
    /// wins and later duplicates are silently ignored.
    pub override_mode: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { override_mode: true }
    }
}

/// A constructed policy loader: resolved search path plus merged registry.
///
/// Instances are independent; each owns its search-path resolution and its
/// registry, which lives for the lifetime of the gateway process.
pub struct PolicyLoader {
    search_path: SearchPath,
    registry: PolicyRegistry,
}

impl std::fmt::Debug for PolicyLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyLoader")
            .field("search_path", &self.search_path)
            .field("policies", &self.registry.policies().len())
            .finish()
    }
}

impl PolicyLoader {
    /// Explicit mode with the bundled handler kinds: scan exactly the given
    /// absolute directories, earliest-first.
    pub fn create<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::create_with(paths, LoaderOptions::default(), &HandlerCatalog::with_builtins())
    }

    /// Explicit mode with caller-controlled options and handler catalog.
    pub fn create_with<I, P>(
        paths: I,
        options: LoaderOptions,
        catalog: &HandlerCatalog,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let search_path = SearchPath::explicit(paths.into_iter().map(Into::into).collect())?;
        Self::load(search_path, options, catalog)
    }

    /// Default (environment-driven) mode: built-ins plus the directory
    /// resolved from `POLYGATE_CONFIG_PATH` or the working-directory
    /// convention. Reads the process environment exactly once, here.
    pub fn create_default(options: LoaderOptions) -> Result<Self> {
        let env = ResolutionEnv::capture()?;
        Self::create_default_with(options, &env, &HandlerCatalog::with_builtins())
    }

    /// Default mode with an injected environment snapshot and catalog.
    pub fn create_default_with(
        options: LoaderOptions,
        env: &ResolutionEnv,
        catalog: &HandlerCatalog,
    ) -> Result<Self> {
        let search_path = SearchPath::resolve_default(env)?;
        Self::load(search_path, options, catalog)
    }

    fn load(search_path: SearchPath, options: LoaderOptions, catalog: &HandlerCatalog) -> Result<Self> {
        let mut scans = Vec::with_capacity(search_path.entries().len());
        for dir in search_path.entries() {
            let definitions = scanner::scan_dir(dir, catalog)?;
            scans.push((dir.clone(), definitions));
        }

        let table = merger::merge(scans, options.override_mode);
        tracing::info!(policies = table.len(), "policy registry constructed");

        Ok(Self {
            search_path,
            registry: PolicyRegistry::new(table),
        })
    }

    /// The resolved search path, earliest-first.
    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// The merged, read-only policy table.
    pub fn policies(&self) -> &HashMap<String, Handler> {
        self.registry.policies()
    }

    /// Lookup by name.
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.registry.get(name)
    }
}
