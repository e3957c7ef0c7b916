//! Plugin object model and reflection tables.
//!
//! Rust has no built-in object-model reflection, so every module carries a
//! self-describing method table ([`TypeInfo`]) that the host reads instead of
//! querying a runtime type system. Plugin authors build the table once and
//! return it from [`PluginObject::type_info`].

use std::any::Any;

/// Class name under which the framework-provided base operations are declared.
///
/// Every [`TypeInfo`] created through [`TypeInfo::new`] starts with these
/// rows; hosts can filter them out by comparing a row's declaring class
/// against the table's own class name.
pub const BASE_CLASS_NAME: &str = "ModuleObject";

/// Kind of a reflected method entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Ordinary callable operation.
    Method,
    /// Slot-style callable (invokable like a method).
    Slot,
    /// Declarative signal; listed but not invokable.
    Signal,
}

impl MethodKind {
    /// Whether entries of this kind can be invoked by a host.
    pub fn is_invokable(self) -> bool {
        matches!(self, MethodKind::Method | MethodKind::Slot)
    }
}

/// One parameter of a reflected method.
///
/// The type name is whatever the module declares; it is not validated
/// against any type system. The name may be absent, in which case hosts
/// synthesize a positional fallback.
#[derive(Debug, Clone)]
pub struct ParamRecord {
    /// Declared parameter name, if the module provides one.
    pub name: Option<String>,
    /// Declared type name.
    pub type_name: String,
}

/// One row of a module's method table.
#[derive(Debug, Clone)]
pub struct MethodRecord {
    /// Bare method name.
    pub name: String,
    /// Declared return type name. Empty or `"void"` means no value.
    pub return_type: String,
    /// Entry kind (method, slot, signal).
    pub kind: MethodKind,
    /// Class that declares this entry. Left empty in the builders and filled
    /// in by [`TypeInfo::with_method`] with the table's own class name.
    pub declaring_class: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParamRecord>,
}

impl MethodRecord {
    /// Create an ordinary method entry.
    pub fn method(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            kind: MethodKind::Method,
            declaring_class: String::new(),
            parameters: Vec::new(),
        }
    }

    /// Create a slot entry.
    pub fn slot(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            kind: MethodKind::Slot,
            ..Self::method(name, return_type)
        }
    }

    /// Create a signal entry. Signals carry no return value.
    pub fn signal(name: impl Into<String>) -> Self {
        Self {
            kind: MethodKind::Signal,
            ..Self::method(name, "")
        }
    }

    /// Append an unnamed parameter.
    pub fn with_parameter(mut self, type_name: impl Into<String>) -> Self {
        self.parameters.push(ParamRecord {
            name: None,
            type_name: type_name.into(),
        });
        self
    }

    /// Append a named parameter.
    pub fn with_named_parameter(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.parameters.push(ParamRecord {
            name: Some(name.into()),
            type_name: type_name.into(),
        });
        self
    }

    fn declared_by(mut self, class: impl Into<String>) -> Self {
        self.declaring_class = class.into();
        self
    }
}

/// Full reflection table for a plugin object's most-derived type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    class_name: String,
    methods: Vec<MethodRecord>,
}

impl TypeInfo {
    /// Create a table for `class_name`, pre-populated with the framework
    /// base-object rows (declared under [`BASE_CLASS_NAME`]).
    pub fn new(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        let methods = vec![
            MethodRecord::method("typeName", "string").declared_by(BASE_CLASS_NAME),
            MethodRecord::slot("shutdown", "void").declared_by(BASE_CLASS_NAME),
            MethodRecord::signal("stateChanged")
                .with_named_parameter("state", "string")
                .declared_by(BASE_CLASS_NAME),
        ];
        Self {
            class_name,
            methods,
        }
    }

    /// Append a method row. Rows with an empty declaring class are attributed
    /// to this table's own class.
    pub fn with_method(mut self, mut record: MethodRecord) -> Self {
        if record.declaring_class.is_empty() {
            record.declaring_class = self.class_name.clone();
        }
        self.methods.push(record);
        self
    }

    /// Dynamic type name this table describes.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// All rows in declaration order, base-object rows included.
    pub fn methods(&self) -> &[MethodRecord] {
        &self.methods
    }
}

/// Trait implemented by every module object visible to a host.
///
/// This is the narrow seam between a module and the host: a reflection table
/// for introspection, `Any` access for checked concrete downcasts, and an
/// identifier-based capability query for interface negotiation.
pub trait PluginObject: Any + Send + Sync {
    /// The object's self-describing reflection table.
    fn type_info(&self) -> &TypeInfo;

    /// Upcast for checked downcasting via [`Any`].
    fn as_any(&self) -> &dyn Any;

    /// Interface negotiation: return the capability object registered under
    /// `id`, or `None` when the module does not support it.
    fn query_capability(&self, id: &str) -> Option<&dyn Any> {
        let _ = id;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rows_are_prepended() {
        let info = TypeInfo::new("DemoModule");
        assert_eq!(info.class_name(), "DemoModule");
        assert_eq!(info.methods().len(), 3);
        assert!(info
            .methods()
            .iter()
            .all(|m| m.declaring_class == BASE_CLASS_NAME));
    }

    #[test]
    fn with_method_fills_declaring_class() {
        let info = TypeInfo::new("DemoModule")
            .with_method(MethodRecord::method("ping", "bool"));
        let row = info.methods().last().unwrap();
        assert_eq!(row.declaring_class, "DemoModule");
    }

    #[test]
    fn explicit_declaring_class_is_kept() {
        let info = TypeInfo::new("DemoModule")
            .with_method(MethodRecord::method("helper", "void").declared_by("Mixin"));
        assert_eq!(info.methods().last().unwrap().declaring_class, "Mixin");
    }

    #[test]
    fn invokability_follows_kind() {
        assert!(MethodKind::Method.is_invokable());
        assert!(MethodKind::Slot.is_invokable());
        assert!(!MethodKind::Signal.is_invokable());
    }
}
