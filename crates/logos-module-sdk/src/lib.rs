//! Plugin-side contract for Logos modules.
//!
//! This crate defines everything a module compiles against, and nothing a
//! host needs beyond it:
//!
//! - the `#[repr(C)]` descriptor a dynamic library exports under a fixed
//!   symbol ([`descriptor`]),
//! - the [`PluginObject`] trait and the self-describing reflection tables
//!   hosts introspect ([`object`]),
//! - the process-wide registry for statically linked modules ([`registry`]),
//! - the [`declare_module!`] export macro.
//!
//! Dynamic modules build as `cdylib` and call `declare_module!`; statically
//! linked modules call [`register_static_module`] during startup instead.

pub mod descriptor;
pub mod macros;
pub mod object;
pub mod registry;

pub use descriptor::{
    CreateFn, DestroyFn, InstanceCell, ModuleDescriptor, MODULE_ABI_VERSION, MODULE_ENTRY_SYMBOL,
};
pub use object::{
    MethodKind, MethodRecord, ParamRecord, PluginObject, TypeInfo, BASE_CLASS_NAME,
};
pub use registry::{register_static_module, static_modules, StaticModule};

/// Re-exports commonly used by module authors.
pub mod prelude {
    pub use crate::declare_module;
    pub use crate::descriptor::{InstanceCell, ModuleDescriptor, MODULE_ABI_VERSION};
    pub use crate::object::{MethodKind, MethodRecord, ParamRecord, PluginObject, TypeInfo};
    pub use crate::registry::register_static_module;
}
