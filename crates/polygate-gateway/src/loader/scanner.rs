//! Definition scanner: one directory in, zero or more policy definitions out.
//!
//! A policy unit is an immediate child directory holding a `policy.yaml`
//! manifest (strict parsing). The scanner resolves the manifest's `kind`
//! through the injected [`HandlerCatalog`]; it never constructs handlers
//! itself. Any unit that fails to load aborts the whole scan — a gateway
//! silently running with missing policies is a correctness hazard.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use polygate_core::{GateError, Handler, Result};

use crate::catalog::HandlerCatalog;

/// Manifest file expected in every policy unit directory.
pub const MANIFEST_FILE: &str = "policy.yaml";

/// Unit manifest (strict: unknown fields are load errors).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyManifest {
    /// Policy name; defaults to the unit directory name.
    #[serde(default)]
    name: Option<String>,
    /// Handler kind, resolved through the catalog.
    kind: String,
    /// Free-form configuration handed to the handler factory.
    #[serde(default)]
    config: Value,
}

/// A discovered (name, handler) pair. Names are unique within one directory
/// scan only; cross-directory collisions are the merger's job.
pub struct PolicyDefinition {
    pub name: String,
    pub handler: Handler,
}

impl std::fmt::Debug for PolicyDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Scan one directory for policy units.
///
/// An empty directory yields an empty result, not an error. Non-directory
/// children (a README, say) are ignored. Units are visited in lexicographic
/// name order so duplicate names within one directory resolve
/// deterministically.
pub fn scan_dir(dir: &Path, catalog: &HandlerCatalog) -> Result<Vec<PolicyDefinition>> {
    let mut units: Vec<PathBuf> = Vec::new();
    let entries = fs::read_dir(dir)
        .map_err(|e| GateError::Internal(format!("read {}: {e}", dir.display())))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| GateError::Internal(format!("read {}: {e}", dir.display())))?;
        let path = entry.path();
        if path.is_dir() {
            units.push(path);
        }
    }
    units.sort();

    let mut definitions = Vec::with_capacity(units.len());
    for unit in &units {
        definitions.push(load_unit(unit, catalog)?);
    }
    tracing::debug!(dir = %dir.display(), count = definitions.len(), "scanned policy directory");
    Ok(definitions)
}

fn load_unit(unit: &Path, catalog: &HandlerCatalog) -> Result<PolicyDefinition> {
    let manifest_path = unit.join(MANIFEST_FILE);
    let raw = fs::read_to_string(&manifest_path).map_err(|e| {
        GateError::InvalidDefinition(format!(
            "policy unit {} has no readable {MANIFEST_FILE}: {e}",
            unit.display()
        ))
    })?;

    let manifest: PolicyManifest = serde_yaml::from_str(&raw).map_err(|e| {
        GateError::InvalidDefinition(format!("invalid manifest {}: {e}", manifest_path.display()))
    })?;

    let name = match manifest.name {
        Some(name) => name,
        None => unit
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_default(),
    };
    if name.is_empty() {
        return Err(GateError::InvalidDefinition(format!(
            "policy unit {} has an empty name",
            unit.display()
        )));
    }

    let handler = catalog.build(&manifest.kind, &manifest.config).map_err(|e| {
        GateError::InvalidDefinition(format!("policy unit {}: {e}", unit.display()))
    })?;

    tracing::debug!(policy = %name, kind = %manifest.kind, unit = %unit.display(), "loaded policy unit");
    Ok(PolicyDefinition { name, handler })
}
