//! polygate gateway startup.
//!
//! Builds the policy registry before any request traffic begins:
//! - default-mode search path (POLYGATE_CONFIG_PATH, cwd convention, built-ins)
//! - one log line per registered policy
//! - non-zero exit on any loader error (no partial registry)

use tracing_subscriber::{fmt, EnvFilter};

use polygate_gateway::loader::{LoaderOptions, PolicyLoader};

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let loader = match PolicyLoader::create_default(LoaderOptions::default()) {
        Ok(loader) => loader,
        Err(e) => {
            tracing::error!(error = %e, code = e.client_code().as_str(), "policy registry construction failed");
            std::process::exit(1);
        }
    };

    for dir in loader.search_path().entries() {
        tracing::info!(dir = %dir.display(), "policy directory");
    }
    for name in loader.registry().names() {
        tracing::info!(policy = %name, "policy registered");
    }
    tracing::info!(policies = loader.registry().len(), "polygate policy registry ready");
}
