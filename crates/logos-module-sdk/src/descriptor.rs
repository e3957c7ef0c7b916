//! Module descriptor ABI.
//!
//! Every dynamic module exports a single `#[repr(C)]` descriptor under the
//! fixed symbol [`MODULE_ENTRY_SYMBOL`]. The descriptor carries the embedded
//! metadata document (readable without instantiation) and the create/destroy
//! entry points for the module's one instantiable object.

use crate::object::PluginObject;

/// Current module ABI version. A host refuses descriptors with any other
/// version.
pub const MODULE_ABI_VERSION: u32 = 1;

/// Symbol name under which a module exports its [`ModuleDescriptor`].
pub const MODULE_ENTRY_SYMBOL: &[u8] = b"logos_module_descriptor";

/// Opaque cell that carries a trait object across the library boundary
/// behind a thin pointer.
pub struct InstanceCell {
    object: Box<dyn PluginObject>,
}

impl InstanceCell {
    /// Wrap a module object.
    pub fn new(object: Box<dyn PluginObject>) -> Self {
        Self { object }
    }

    /// Transfer the cell to a raw pointer for the C entry point.
    pub fn into_raw(self) -> *mut InstanceCell {
        Box::into_raw(Box::new(self))
    }

    /// Reclaim a cell previously produced by [`InstanceCell::into_raw`].
    ///
    /// # Safety
    /// `raw` must come from `into_raw` and must not be reclaimed twice.
    pub unsafe fn from_raw(raw: *mut InstanceCell) -> Box<InstanceCell> {
        Box::from_raw(raw)
    }

    /// Borrow the wrapped object.
    pub fn object(&self) -> &dyn PluginObject {
        self.object.as_ref()
    }
}

/// Entry point producing the module's single instance, or null on failure.
pub type CreateFn = unsafe extern "C" fn() -> *mut InstanceCell;

/// Entry point destroying an instance produced by the module's [`CreateFn`].
pub type DestroyFn = unsafe extern "C" fn(*mut InstanceCell);

/// Descriptor exported by every dynamic module.
///
/// `metadata_json` points to a UTF-8 document shaped
/// `{"MetaData": {"name": ..., ...}}`; a null pointer or zero length means
/// the module declares no metadata, which is not a load failure.
#[repr(C)]
pub struct ModuleDescriptor {
    /// Must equal [`MODULE_ABI_VERSION`].
    pub abi_version: u32,

    /// Embedded metadata document (may be null).
    pub metadata_json: *const u8,
    pub metadata_json_len: usize,

    /// Instance constructor.
    pub create: CreateFn,

    /// Instance destructor.
    pub destroy: DestroyFn,
}

impl ModuleDescriptor {
    /// The embedded metadata document, if the module declares one.
    ///
    /// # Safety
    /// `metadata_json` must either be null or point to `metadata_json_len`
    /// bytes that stay valid for the lifetime of the loaded library.
    pub unsafe fn metadata_str(&self) -> Option<&str> {
        if self.metadata_json.is_null() || self.metadata_json_len == 0 {
            return None;
        }
        let bytes = std::slice::from_raw_parts(self.metadata_json, self.metadata_json_len);
        std::str::from_utf8(bytes).ok()
    }
}

// SAFETY: descriptors are exported as statics; the pointers they carry refer
// to 'static data baked into the module image, never to mutable state.
unsafe impl Sync for ModuleDescriptor {}
unsafe impl Send for ModuleDescriptor {}
