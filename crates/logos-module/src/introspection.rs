//! Runtime introspection of module methods.
//!
//! Modules carry a self-describing reflection table (see the SDK's
//! `TypeInfo`); the functions here flatten that table into serializable
//! method manifests. A missing object always degrades to an empty result,
//! never an error.

use serde::Serialize;
use serde_json::Value;

use logos_module_sdk::object::{MethodRecord, PluginObject};

/// Information about a single method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    /// Parameter name; synthesized as `param<index>` when the module
    /// declares none.
    pub name: String,

    /// Declared type name, not validated against any type system.
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Information about a single method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    /// Bare method name.
    pub name: String,

    /// Canonical signature, independent of parameter names, e.g.
    /// `installPlugin(string)`.
    pub signature: String,

    /// Return type name; empty string means no value (a declared `void`
    /// normalizes to empty).
    #[serde(rename = "returnType")]
    pub return_type: String,

    /// Whether the entry is an ordinary callable or slot, as opposed to a
    /// declarative signal.
    #[serde(rename = "isInvokable")]
    pub is_invokable: bool,

    /// Parameters in declaration order. Omitted from JSON when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterInfo>,
}

impl MethodInfo {
    fn from_record(record: &MethodRecord) -> Self {
        let parameters: Vec<ParameterInfo> = record
            .parameters
            .iter()
            .enumerate()
            .map(|(index, param)| ParameterInfo {
                name: param
                    .name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("param{}", index)),
                type_name: param.type_name.clone(),
            })
            .collect();

        let signature = format!(
            "{}({})",
            record.name,
            record
                .parameters
                .iter()
                .map(|param| param.type_name.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );

        let return_type = if record.return_type == "void" {
            String::new()
        } else {
            record.return_type.clone()
        };

        Self {
            name: record.name.clone(),
            signature,
            return_type,
            is_invokable: record.kind.is_invokable(),
            parameters,
        }
    }
}

/// Enumerate the methods a module object exposes.
///
/// With `exclude_base_class` set, entries declared by anything other than
/// the object's most-derived class are filtered out. The filter is on
/// declaring-class identity, never on names.
pub fn get_methods(object: Option<&dyn PluginObject>, exclude_base_class: bool) -> Vec<MethodInfo> {
    let Some(object) = object else {
        tracing::warn!("introspection requested for a missing module object");
        return Vec::new();
    };

    let info = object.type_info();
    info.methods()
        .iter()
        .filter(|record| !exclude_base_class || record.declaring_class == info.class_name())
        .map(MethodInfo::from_record)
        .collect()
}

/// Same enumeration serialized as a JSON array.
pub fn get_methods_as_json(object: Option<&dyn PluginObject>, exclude_base_class: bool) -> Value {
    let methods = get_methods(object, exclude_base_class);
    serde_json::to_value(methods).unwrap_or_else(|_| Value::Array(Vec::new()))
}

/// Dynamic type name of a module object; empty when the object is missing.
pub fn get_class_name(object: Option<&dyn PluginObject>) -> String {
    object
        .map(|obj| obj.type_info().class_name().to_string())
        .unwrap_or_default()
}

/// Whether the object exposes a method with this exact name.
///
/// Searches the full enumeration, base-class entries included. False for a
/// missing object or an empty name.
pub fn has_method(object: Option<&dyn PluginObject>, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    get_methods(object, false)
        .iter()
        .any(|method| method.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos_module_sdk::object::{MethodRecord, TypeInfo, BASE_CLASS_NAME};
    use std::any::Any;

    struct Fixture {
        info: TypeInfo,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                info: TypeInfo::new("FixtureModule")
                    .with_method(
                        MethodRecord::method("installPlugin", "bool")
                            .with_named_parameter("pluginPath", "string"),
                    )
                    .with_method(
                        MethodRecord::method("copyFile", "bool")
                            .with_named_parameter("source", "string")
                            .with_parameter("string"),
                    )
                    .with_method(MethodRecord::slot("refresh", "void"))
                    .with_method(MethodRecord::signal("installed").with_parameter("string")),
            }
        }
    }

    impl PluginObject for Fixture {
        fn type_info(&self) -> &TypeInfo {
            &self.info
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn missing_object_degrades_to_empty_results() {
        assert!(get_methods(None, true).is_empty());
        assert!(get_methods(None, false).is_empty());
        assert_eq!(get_class_name(None), "");
        assert!(!has_method(None, "anything"));
        assert_eq!(get_methods_as_json(None, true), serde_json::json!([]));
    }

    #[test]
    fn base_class_filter_is_a_strict_subset() {
        let fixture = Fixture::new();
        let all = get_methods(Some(&fixture), false);
        let own = get_methods(Some(&fixture), true);

        assert!(own.len() < all.len());
        assert!(all.iter().any(|m| m.name == "typeName"));
        assert!(own.iter().all(|m| m.name != "typeName"));
        assert!(own.iter().any(|m| m.name == "installPlugin"));
    }

    #[test]
    fn filter_uses_declaring_class_not_names() {
        // A derived method deliberately named like a base entry survives the
        // filter while the base entry does not.
        struct Shadowing {
            info: TypeInfo,
        }
        impl PluginObject for Shadowing {
            fn type_info(&self) -> &TypeInfo {
                &self.info
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let fixture = Shadowing {
            info: TypeInfo::new("ShadowModule")
                .with_method(MethodRecord::method("typeName", "string")),
        };
        let own = get_methods(Some(&fixture), true);
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].name, "typeName");
    }

    #[test]
    fn signature_is_canonical_and_name_independent() {
        let fixture = Fixture::new();
        let methods = get_methods(Some(&fixture), true);
        let copy = methods.iter().find(|m| m.name == "copyFile").unwrap();
        assert_eq!(copy.signature, "copyFile(string,string)");
    }

    #[test]
    fn void_returns_normalize_to_empty() {
        let fixture = Fixture::new();
        let methods = get_methods(Some(&fixture), true);
        let refresh = methods.iter().find(|m| m.name == "refresh").unwrap();
        assert_eq!(refresh.return_type, "");
        assert!(refresh.is_invokable);
    }

    #[test]
    fn signals_are_listed_but_not_invokable() {
        let fixture = Fixture::new();
        let methods = get_methods(Some(&fixture), true);
        let signal = methods.iter().find(|m| m.name == "installed").unwrap();
        assert!(!signal.is_invokable);
    }

    #[test]
    fn unnamed_parameters_get_positional_fallbacks() {
        let fixture = Fixture::new();
        let methods = get_methods(Some(&fixture), true);
        let copy = methods.iter().find(|m| m.name == "copyFile").unwrap();
        assert_eq!(copy.parameters.len(), 2);
        assert_eq!(copy.parameters[0].name, "source");
        assert_eq!(copy.parameters[1].name, "param1");
    }

    #[test]
    fn json_omits_empty_parameter_arrays() {
        let fixture = Fixture::new();
        let json = get_methods_as_json(Some(&fixture), true);
        let methods = json.as_array().unwrap();

        let refresh = methods
            .iter()
            .find(|m| m["name"] == "refresh")
            .unwrap();
        assert!(refresh.get("parameters").is_none());

        let install = methods
            .iter()
            .find(|m| m["name"] == "installPlugin")
            .unwrap();
        let params = install["parameters"].as_array().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0]["name"], "pluginPath");
        assert_eq!(params[0]["type"], "string");
        assert_eq!(install["returnType"], "bool");
        assert_eq!(install["isInvokable"], true);
    }

    #[test]
    fn has_method_searches_the_full_enumeration() {
        let fixture = Fixture::new();
        assert!(has_method(Some(&fixture), "installPlugin"));
        assert!(has_method(Some(&fixture), "typeName"));
        assert!(!has_method(Some(&fixture), "install"));
        assert!(!has_method(Some(&fixture), ""));
    }

    #[test]
    fn base_entries_declare_the_framework_class() {
        let fixture = Fixture::new();
        let base_rows = fixture
            .type_info()
            .methods()
            .iter()
            .filter(|m| m.declaring_class == BASE_CLASS_NAME)
            .count();
        assert!(base_rows > 0);
    }
}
