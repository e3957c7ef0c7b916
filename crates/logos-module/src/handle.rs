//! Module handle: load/unload lifecycle and capability access.
//!
//! A [`ModuleHandle`] owns at most one loaded library resource and the
//! instance created from it. Ownership is move-only and enum-tagged: a
//! dynamically loaded module owns its library, while static and wrapped
//! modules never touch the underlying resource.

use std::any::Any;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use libloading::{Library, Symbol};
use serde_json::Value;

use logos_module_sdk::descriptor::{
    DestroyFn, InstanceCell, ModuleDescriptor, MODULE_ABI_VERSION, MODULE_ENTRY_SYMBOL,
};
use logos_module_sdk::object::PluginObject;
use logos_module_sdk::registry;

use crate::error::{ModuleError, Result};
use crate::introspection::{self, MethodInfo};
use crate::metadata::ModuleMetadata;

/// A dynamically created instance together with the library that backs it.
///
/// The instance is destroyed through the module's own destroy entry point
/// before the library handle closes.
struct DynamicInstance {
    cell: NonNull<InstanceCell>,
    destroy: DestroyFn,
    _library: Library,
}

impl DynamicInstance {
    fn object(&self) -> &dyn PluginObject {
        unsafe { self.cell.as_ref().object() }
    }
}

impl Drop for DynamicInstance {
    fn drop(&mut self) {
        unsafe {
            (self.destroy)(self.cell.as_ptr());
        }
    }
}

// SAFETY: the cell pointer is owned exclusively by this wrapper and the
// wrapped object is required to be Send + Sync by the PluginObject trait;
// moving the single owner between threads is sound.
unsafe impl Send for DynamicInstance {}

/// Tagged ownership state of a handle.
enum Ownership {
    /// Never loaded, unloaded, or released.
    Empty,
    /// Dynamically loaded; this handle is the sole owner of the library.
    Dynamic(DynamicInstance),
    /// Static or wrapped; the instance's lifetime is owned elsewhere.
    External(Arc<dyn PluginObject>),
}

/// An instance whose ownership was transferred out of a handle via
/// [`ModuleHandle::release`].
///
/// For dynamically loaded modules this keeps the backing library alive for
/// as long as the caller holds it.
pub struct ReleasedModule {
    inner: ReleasedInner,
}

enum ReleasedInner {
    Dynamic(DynamicInstance),
    External(Arc<dyn PluginObject>),
}

impl ReleasedModule {
    /// The live module object.
    pub fn object(&self) -> &dyn PluginObject {
        match &self.inner {
            ReleasedInner::Dynamic(instance) => instance.object(),
            ReleasedInner::External(instance) => instance.as_ref(),
        }
    }
}

/// RAII handle for a loaded module.
///
/// Handles are move-only. Loading never fails at the signature level: check
/// [`is_valid`] and read [`error_string`] instead of expecting success.
///
/// [`is_valid`]: ModuleHandle::is_valid
/// [`error_string`]: ModuleHandle::error_string
pub struct ModuleHandle {
    ownership: Ownership,
    metadata: ModuleMetadata,
    error: Option<String>,
}

impl Default for ModuleHandle {
    fn default() -> Self {
        Self {
            ownership: Ownership::Empty,
            metadata: ModuleMetadata::default(),
            error: None,
        }
    }
}

impl ModuleHandle {
    /// Load a module from a library path.
    ///
    /// Always returns a handle; on failure the handle is invalid and
    /// carries the loader's diagnostic. Metadata is best-effort: a module
    /// without a usable descriptor document still loads.
    pub fn load_from_path(path: impl AsRef<Path>) -> ModuleHandle {
        let path = path.as_ref();
        match try_load(path) {
            Ok((instance, metadata)) => {
                tracing::debug!("module loaded successfully: {}", path.display());
                ModuleHandle {
                    ownership: Ownership::Dynamic(instance),
                    metadata,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!("failed to load module {}: {}", path.display(), e);
                ModuleHandle {
                    error: Some(e.to_string()),
                    ..ModuleHandle::default()
                }
            }
        }
    }

    /// Extract metadata from a module binary without instantiating it.
    pub fn extract_metadata(path: impl AsRef<Path>) -> Option<ModuleMetadata> {
        ModuleMetadata::from_path(path)
    }

    /// Enumerate all statically registered module instances, in
    /// registration order.
    pub fn get_static_modules() -> Vec<ModuleHandle> {
        let modules = registry::static_modules();
        tracing::debug!("found {} static module instances", modules.len());

        modules
            .into_iter()
            .map(|entry| {
                let metadata =
                    ModuleMetadata::from_descriptor(&entry.raw_descriptor).unwrap_or_default();
                Self::wrap_existing(entry.instance, metadata)
            })
            .collect()
    }

    /// Adopt an already-instantiated object with caller-supplied metadata.
    ///
    /// The handle is marked static: it never owns the instance's resources
    /// and [`unload`] is a permanent no-op.
    ///
    /// [`unload`]: ModuleHandle::unload
    pub fn wrap_existing(instance: Arc<dyn PluginObject>, metadata: ModuleMetadata) -> ModuleHandle {
        ModuleHandle {
            ownership: Ownership::External(instance),
            metadata,
            error: None,
        }
    }

    /// Whether the handle holds a live instance.
    pub fn is_valid(&self) -> bool {
        !matches!(self.ownership, Ownership::Empty)
    }

    /// Whether the instance's lifetime is owned elsewhere (static
    /// registration or [`wrap_existing`]).
    ///
    /// [`wrap_existing`]: ModuleHandle::wrap_existing
    pub fn is_static(&self) -> bool {
        matches!(self.ownership, Ownership::External(_))
    }

    /// The live module object, if any.
    pub fn instance(&self) -> Option<&dyn PluginObject> {
        match &self.ownership {
            Ownership::Empty => None,
            Ownership::Dynamic(instance) => Some(instance.object()),
            Ownership::External(instance) => Some(instance.as_ref()),
        }
    }

    /// Metadata attached at load time. May be a default (invalid) record
    /// when the module declared none.
    pub fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    /// Diagnostic from a failed load, if any.
    pub fn error_string(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Checked downcast of the live instance to a concrete capability type.
    ///
    /// Returns `None` on mismatch or on an invalid handle; never has side
    /// effects.
    pub fn cast<T: Any>(&self) -> Option<&T> {
        self.instance()?.as_any().downcast_ref::<T>()
    }

    /// Identifier-based capability negotiation, delegated to the module's
    /// `query_capability`.
    pub fn capability(&self, id: &str) -> Option<&dyn Any> {
        self.instance()?.query_capability(id)
    }

    /// Unload the module and release its library resource.
    ///
    /// Idempotent: unloading twice, or unloading a handle that never
    /// loaded, is a safe no-op. Static handles are never unloaded
    /// regardless of call count.
    pub fn unload(&mut self) {
        if matches!(self.ownership, Ownership::Dynamic(_)) {
            self.ownership = Ownership::Empty;
        }
    }

    /// Transfer ownership of the instance out of the handle.
    ///
    /// The handle becomes inert afterwards: it is no longer valid and its
    /// destruction cannot touch the instance or the library resource.
    /// Returns `None` on an invalid handle.
    pub fn release(&mut self) -> Option<ReleasedModule> {
        match std::mem::replace(&mut self.ownership, Ownership::Empty) {
            Ownership::Empty => None,
            Ownership::Dynamic(instance) => Some(ReleasedModule {
                inner: ReleasedInner::Dynamic(instance),
            }),
            Ownership::External(instance) => Some(ReleasedModule {
                inner: ReleasedInner::External(instance),
            }),
        }
    }

    /// Methods exposed by the live instance. Empty for an invalid handle.
    pub fn get_methods(&self, exclude_base_class: bool) -> Vec<MethodInfo> {
        introspection::get_methods(self.instance(), exclude_base_class)
    }

    /// JSON manifest of the live instance's methods.
    pub fn get_methods_as_json(&self, exclude_base_class: bool) -> Value {
        introspection::get_methods_as_json(self.instance(), exclude_base_class)
    }

    /// Dynamic type name of the live instance. Empty for an invalid handle.
    pub fn get_class_name(&self) -> String {
        introspection::get_class_name(self.instance())
    }

    /// Whether the live instance exposes a method with this exact name,
    /// base-class entries included.
    pub fn has_method(&self, name: &str) -> bool {
        introspection::has_method(self.instance(), name)
    }
}

/// Resolve the descriptor exported by an opened library.
///
/// # Safety
/// The returned reference is only valid while `library` stays loaded.
unsafe fn find_descriptor(library: &Library) -> Result<&ModuleDescriptor> {
    let symbol: Symbol<*const ModuleDescriptor> = library
        .get(MODULE_ENTRY_SYMBOL)
        .map_err(|e| ModuleError::MissingEntryPoint(e.to_string()))?;

    let descriptor = *symbol;
    if descriptor.is_null() {
        return Err(ModuleError::MissingEntryPoint(
            "descriptor symbol resolved to null".into(),
        ));
    }

    let descriptor = &*descriptor;
    if descriptor.abi_version != MODULE_ABI_VERSION {
        return Err(ModuleError::AbiMismatch {
            expected: MODULE_ABI_VERSION,
            found: descriptor.abi_version,
        });
    }

    Ok(descriptor)
}

/// Parse the descriptor's embedded metadata document, tolerating absence
/// and malformed text.
unsafe fn embedded_metadata(descriptor: &ModuleDescriptor) -> Option<Value> {
    let doc = descriptor.metadata_str()?;
    serde_json::from_str(doc).ok()
}

/// Read the embedded metadata document from a module binary without calling
/// its create entry point. The library is opened only for the duration of
/// the read.
pub(crate) fn read_embedded_metadata(path: &Path) -> Result<Option<Value>> {
    let library = unsafe {
        Library::new(path).map_err(|e| ModuleError::LoadFailed(e.to_string()))?
    };
    let descriptor = unsafe { find_descriptor(&library)? };
    Ok(unsafe { embedded_metadata(descriptor) })
}

/// Full load: resolve the binary, read its descriptor, instantiate the
/// module object. On any failure every partially-acquired resource is
/// released before returning.
fn try_load(path: &Path) -> Result<(DynamicInstance, ModuleMetadata)> {
    let library = unsafe {
        Library::new(path).map_err(|e| ModuleError::LoadFailed(e.to_string()))?
    };

    let (create, destroy, metadata) = {
        let descriptor = unsafe { find_descriptor(&library)? };
        let metadata = unsafe { embedded_metadata(descriptor) }
            .as_ref()
            .and_then(ModuleMetadata::from_descriptor)
            .unwrap_or_default();
        (descriptor.create, descriptor.destroy, metadata)
    };

    let raw = unsafe { create() };
    let cell = NonNull::new(raw).ok_or_else(|| {
        ModuleError::InstantiationFailed("create entry point returned null".into())
    })?;

    Ok((
        DynamicInstance {
            cell,
            destroy,
            _library: library,
        },
        metadata,
    ))
}
