//! Search-path resolution for the policy loader.
//!
//! Two entry modes: explicit (caller supplies absolute directories) and
//! default (environment variable, then working-directory convention, then
//! built-ins only). Environment state is captured once into an immutable
//! [`ResolutionEnv`] so resolution stays a pure function of its inputs.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use polygate_core::{GateError, Result};

/// Environment variable naming the configuration root directory.
pub const CONFIG_PATH_VAR: &str = "POLYGATE_CONFIG_PATH";

/// Conventional sub-directory holding one unit per policy.
pub const POLICIES_SUBDIR: &str = "policies";

/// Policy definitions bundled with this crate.
pub fn builtin_policies_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(POLICIES_SUBDIR)
}

/// Process state consulted by default-mode resolution, captured exactly once
/// at construction time. Tests inject their own values instead of mutating
/// process globals.
#[derive(Debug, Clone)]
pub struct ResolutionEnv {
    /// Value of [`CONFIG_PATH_VAR`], if set.
    pub config_root: Option<PathBuf>,
    /// Working directory probed for the [`POLICIES_SUBDIR`] convention.
    pub cwd: PathBuf,
}

impl ResolutionEnv {
    /// Snapshot the real process environment.
    pub fn capture() -> Result<Self> {
        let config_root = env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let cwd = env::current_dir()
            .map_err(|e| GateError::Internal(format!("cannot determine working directory: {e}")))?;
        Ok(Self { config_root, cwd })
    }
}

/// Ordered list of policy directories, earliest-first.
///
/// Order encodes override precedence: under the default override mode a later
/// entry's definition replaces an earlier one, so built-ins sit at index 0 and
/// the user directory after them.
#[derive(Debug, Clone)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    /// Explicit mode: every supplied path must be absolute.
    ///
    /// Fails with `InvalidPath` before any scanning when a path is relative,
    /// missing, or not a readable directory.
    pub fn explicit(paths: Vec<PathBuf>) -> Result<Self> {
        if paths.is_empty() {
            return Err(GateError::InvalidPath(
                "no policy directories supplied".to_string(),
            ));
        }
        for path in &paths {
            if !path.is_absolute() {
                return Err(GateError::InvalidPath(format!(
                    "policy path must be absolute: {}",
                    path.display()
                )));
            }
        }
        Self::validated(paths)
    }

    /// Default mode: built-ins first, then the user directory resolved from
    /// the environment variable or the working-directory convention.
    ///
    /// Once the environment variable selects a root there is no fallback: a
    /// missing `<root>/policies` is an `InvalidPath` error. Without the
    /// variable, absence of `<cwd>/policies` is not an error and yields the
    /// built-ins alone.
    pub fn resolve_default(env: &ResolutionEnv) -> Result<Self> {
        let mut entries = vec![builtin_policies_dir()];

        if let Some(root) = &env.config_root {
            entries.push(root.join(POLICIES_SUBDIR));
        } else {
            let probe = env.cwd.join(POLICIES_SUBDIR);
            if probe.exists() {
                entries.push(probe);
            }
        }

        Self::validated(entries)
    }

    /// Validate every entry as an absolute, existing, readable directory.
    fn validated(entries: Vec<PathBuf>) -> Result<Self> {
        for path in &entries {
            if !path.is_absolute() {
                return Err(GateError::InvalidPath(format!(
                    "policy path must be absolute: {}",
                    path.display()
                )));
            }
            if !path.is_dir() {
                return Err(GateError::InvalidPath(format!(
                    "not a policy directory: {}",
                    path.display()
                )));
            }
            // Readability probe; permissions surface here, not mid-scan.
            fs::read_dir(path).map_err(|e| {
                GateError::InvalidPath(format!("unreadable policy directory {}: {e}", path.display()))
            })?;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }
}
