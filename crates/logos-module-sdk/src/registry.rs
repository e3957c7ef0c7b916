//! Process-wide registry for statically linked modules.
//!
//! Modules compiled into the host binary register themselves here during
//! startup; hosts enumerate the registry afterwards. The registry is
//! append-only: entries are never mutated or removed, so registration order
//! is stable for the lifetime of the process.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;

use crate::object::PluginObject;

/// One statically registered module instance.
#[derive(Clone)]
pub struct StaticModule {
    /// The live instance. Its lifetime is owned by the registry (and any
    /// other `Arc` holders), never by a host-side handle.
    pub instance: Arc<dyn PluginObject>,

    /// Raw descriptor document for the module, in the same
    /// `{"MetaData": {...}}` shape dynamic modules embed.
    pub raw_descriptor: Value,
}

static REGISTRY: Lazy<RwLock<Vec<StaticModule>>> = Lazy::new(|| RwLock::new(Vec::new()));

/// Register a statically linked module instance.
///
/// Intended to run during a defined startup phase, before any host
/// enumerates the registry.
pub fn register_static_module(instance: Arc<dyn PluginObject>, raw_descriptor: Value) {
    REGISTRY.write().push(StaticModule {
        instance,
        raw_descriptor,
    });
}

/// Snapshot of all registered modules, in registration order.
pub fn static_modules() -> Vec<StaticModule> {
    REGISTRY.read().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::TypeInfo;
    use once_cell::sync::Lazy;
    use serde_json::json;
    use std::any::Any;

    struct Probe {
        info: TypeInfo,
    }

    impl Probe {
        fn new(class: &str) -> Self {
            Self {
                info: TypeInfo::new(class),
            }
        }
    }

    impl PluginObject for Probe {
        fn type_info(&self) -> &TypeInfo {
            &self.info
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    // The registry is process-global, so keep all assertions in one test to
    // avoid ordering races with parallel test threads.
    #[test]
    fn registration_order_is_preserved() {
        static SEEDED: Lazy<()> = Lazy::new(|| {
            register_static_module(
                Arc::new(Probe::new("FirstProbe")),
                json!({"MetaData": {"name": "first"}}),
            );
            register_static_module(
                Arc::new(Probe::new("SecondProbe")),
                json!({"MetaData": {"name": "second"}}),
            );
        });
        Lazy::force(&SEEDED);

        let modules = static_modules();
        let first = modules
            .iter()
            .position(|m| m.instance.type_info().class_name() == "FirstProbe")
            .unwrap();
        let second = modules
            .iter()
            .position(|m| m.instance.type_info().class_name() == "SecondProbe")
            .unwrap();
        assert!(first < second);
        assert_eq!(
            modules[first].raw_descriptor["MetaData"]["name"],
            json!("first")
        );
    }
}
