//! Handler catalog: the capability-loading seam between the scanner and
//! concrete policy implementations.
//!
//! A policy unit on disk declares a `kind`; the catalog owns the mapping from
//! kind to a [`HandlerFactory`] that turns the unit's configuration into an
//! invocable [`Handler`]. The loader core never depends on any single loading
//! mechanism: custom kinds register through the same API the built-ins use.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use polygate_core::{GateError, Handler, Result};

use crate::builtin;

/// Builds a handler from a policy unit's declared configuration.
pub trait HandlerFactory: Send + Sync {
    /// Kind string matched against the unit manifest's `kind` field.
    fn kind(&self) -> &'static str;

    /// Construct the handler. `config` is the manifest's `config` mapping,
    /// `Null` when the unit declared none.
    fn build(&self, config: &Value) -> Result<Handler>;
}

/// Registry of handler factories keyed by kind.
#[derive(Default)]
pub struct HandlerCatalog {
    factories: DashMap<&'static str, Arc<dyn HandlerFactory>>,
}

impl HandlerCatalog {
    /// Empty catalog: no kinds registered.
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Catalog pre-loaded with the bundled policy kinds.
    pub fn with_builtins() -> Self {
        let catalog = Self::new();
        catalog.register(Arc::new(builtin::cors::CorsFactory));
        catalog.register(Arc::new(builtin::invoke::InvokeFactory));
        catalog.register(Arc::new(builtin::set_variable::SetVariableFactory));
        catalog.register(Arc::new(builtin::rate_limit::RateLimitFactory));
        catalog
    }

    /// Register a factory, replacing any previous one for the same kind.
    pub fn register(&self, factory: Arc<dyn HandlerFactory>) {
        self.factories.insert(factory.kind(), factory);
    }

    pub fn registered_kinds(&self) -> Vec<&'static str> {
        self.factories.iter().map(|e| *e.key()).collect()
    }

    /// Build a handler for `kind`, or fail with `InvalidDefinition` when the
    /// kind is unknown.
    pub fn build(&self, kind: &str, config: &Value) -> Result<Handler> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| GateError::InvalidDefinition(format!("unknown policy kind: {kind}")))?
            .value()
            .clone();
        factory.build(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use polygate_core::{Flow, RequestContext};

    #[test]
    fn builtins_are_registered() {
        let catalog = HandlerCatalog::with_builtins();
        let mut kinds = catalog.registered_kinds();
        kinds.sort_unstable();
        assert_eq!(kinds, vec!["cors", "invoke", "rate-limiting", "set-variable"]);
    }

    #[test]
    fn unknown_kind_is_invalid_definition() {
        let catalog = HandlerCatalog::with_builtins();
        let err = catalog.build("no-such-kind", &Value::Null).unwrap_err();
        assert!(matches!(err, GateError::InvalidDefinition(_)));
    }

    #[test]
    fn custom_factory_replaces_builtin() {
        struct NoopFactory;
        impl HandlerFactory for NoopFactory {
            fn kind(&self) -> &'static str {
                "cors"
            }
            fn build(&self, _config: &Value) -> Result<Handler> {
                Ok(Arc::new(
                    |_: &Value, _: &mut RequestContext, flow: &mut dyn Flow| flow.proceed(),
                ))
            }
        }

        let catalog = HandlerCatalog::with_builtins();
        catalog.register(Arc::new(NoopFactory));
        assert!(catalog.build("cors", &Value::Null).is_ok());
        assert_eq!(catalog.registered_kinds().len(), 4);
    }
}
