//! Package manager smoke module.
//!
//! A small but complete module used to exercise the host end to end: it
//! embeds a descriptor document, declares a reflection table with four
//! invokable operations and one signal, and exports itself through
//! `declare_module!` when built as a dynamic library.

use std::any::Any;

use once_cell::sync::Lazy;

use logos_module_sdk::declare_module;
use logos_module_sdk::object::{MethodRecord, PluginObject, TypeInfo};

/// Descriptor document embedded in the module binary.
pub const METADATA_JSON: &str = r#"{"MetaData":{"name":"package_manager","version":"1.0.0","description":"Installs and removes plugins","author":"Logos Contributors","type":"core","dependencies":[]}}"#;

static TYPE_INFO: Lazy<TypeInfo> = Lazy::new(|| {
    TypeInfo::new("PackageManagerModule")
        .with_method(
            MethodRecord::method("installPlugin", "bool")
                .with_named_parameter("pluginPath", "string"),
        )
        .with_method(
            MethodRecord::method("removePlugin", "bool").with_named_parameter("name", "string"),
        )
        .with_method(
            MethodRecord::method("isPluginInstalled", "bool")
                .with_named_parameter("name", "string"),
        )
        .with_method(MethodRecord::method("installedPlugins", "stringlist"))
        .with_method(MethodRecord::signal("pluginInstalled").with_named_parameter("name", "string"))
});

/// The module's one instantiable object.
#[derive(Default)]
pub struct PackageManagerModule {
    installed: Vec<String>,
}

impl PackageManagerModule {
    /// Names of currently installed plugins.
    pub fn installed_plugins(&self) -> &[String] {
        &self.installed
    }
}

impl PluginObject for PackageManagerModule {
    fn type_info(&self) -> &TypeInfo {
        &TYPE_INFO
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

declare_module!(PackageManagerModule, METADATA_JSON);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_the_four_operations() {
        let module = PackageManagerModule::default();
        let own: Vec<_> = module
            .type_info()
            .methods()
            .iter()
            .filter(|m| m.declaring_class == "PackageManagerModule")
            .collect();
        assert_eq!(own.len(), 5);
        assert_eq!(own.iter().filter(|m| m.kind.is_invokable()).count(), 4);
    }

    #[test]
    fn descriptor_static_is_wired() {
        assert_eq!(
            logos_module_descriptor.abi_version,
            logos_module_sdk::descriptor::MODULE_ABI_VERSION
        );
        let doc = unsafe { logos_module_descriptor.metadata_str() }.unwrap();
        assert!(doc.contains("package_manager"));
    }

    #[test]
    fn create_and_destroy_round_trip() {
        let raw = unsafe { (logos_module_descriptor.create)() };
        assert!(!raw.is_null());
        let class = unsafe { (*raw).object().type_info().class_name().to_string() };
        assert_eq!(class, "PackageManagerModule");
        unsafe { (logos_module_descriptor.destroy)(raw) };
    }
}
