//! Host-side module lifecycle manager and capability introspector.
//!
//! This crate loads native shared-library modules, extracts their embedded
//! declarative metadata without instantiating them, manages the
//! load/instantiate/unload lifecycle with move-only ownership, and
//! enumerates a live instance's operations into a machine-readable
//! manifest.
//!
//! ## Example
//!
//! ```no_run
//! use logos_module::ModuleHandle;
//!
//! let handle = ModuleHandle::load_from_path("/path/to/module.so");
//! if !handle.is_valid() {
//!     eprintln!("load failed: {}", handle.error_string().unwrap_or("unknown"));
//!     return;
//! }
//!
//! println!("name: {}", handle.metadata().name);
//! println!("class: {}", handle.get_class_name());
//! for method in handle.get_methods(true) {
//!     println!("  {}", method.signature);
//! }
//! ```
//!
//! All failure modes degrade to sentinels: an invalid handle with an error
//! string, an absent metadata record, an empty enumeration. Nothing in this
//! crate panics on a malformed or partially-loaded module.

pub mod error;
pub mod handle;
pub mod introspection;
pub mod metadata;

pub use error::{ModuleError, Result};
pub use handle::{ModuleHandle, ReleasedModule};
pub use introspection::{
    get_class_name, get_methods, get_methods_as_json, has_method, MethodInfo, ParameterInfo,
};
pub use metadata::{ModuleMetadata, METADATA_KEY};

// The plugin-side contract, re-exported so hosts and in-process modules can
// share one dependency.
pub use logos_module_sdk as sdk;
pub use logos_module_sdk::object::{MethodKind, MethodRecord, ParamRecord, PluginObject, TypeInfo};
