//! Export macro for dynamic modules.

/// Export a type as this library's module entry point.
///
/// Generates the `logos_module_descriptor` static plus the create/destroy
/// shims. The type must implement `PluginObject` and `Default`; the metadata
/// argument must be a `'static` string literal shaped
/// `{"MetaData": {"name": ..., ...}}` (or an empty string for a module that
/// declares no metadata).
///
/// # Example
/// ```ignore
/// use logos_module_sdk::prelude::*;
///
/// #[derive(Default)]
/// struct MyModule;
///
/// impl PluginObject for MyModule {
///     // ...
/// #   fn type_info(&self) -> &TypeInfo { unimplemented!() }
/// #   fn as_any(&self) -> &dyn std::any::Any { self }
/// }
///
/// declare_module!(MyModule, r#"{"MetaData":{"name":"my_module"}}"#);
/// ```
#[macro_export]
macro_rules! declare_module {
    ($ty:ty, $metadata:expr) => {
        // The symbol name is part of the wire contract and must stay as is.
        #[allow(non_upper_case_globals)]
        #[no_mangle]
        pub static logos_module_descriptor: $crate::descriptor::ModuleDescriptor =
            $crate::descriptor::ModuleDescriptor {
                abi_version: $crate::descriptor::MODULE_ABI_VERSION,
                metadata_json: $metadata.as_ptr(),
                metadata_json_len: $metadata.len(),
                create: __logos_module_create,
                destroy: __logos_module_destroy,
            };

        #[doc(hidden)]
        unsafe extern "C" fn __logos_module_create() -> *mut $crate::descriptor::InstanceCell {
            let object: ::std::boxed::Box<dyn $crate::object::PluginObject> =
                ::std::boxed::Box::new(<$ty as ::std::default::Default>::default());
            $crate::descriptor::InstanceCell::new(object).into_raw()
        }

        #[doc(hidden)]
        unsafe extern "C" fn __logos_module_destroy(cell: *mut $crate::descriptor::InstanceCell) {
            if !cell.is_null() {
                drop(unsafe { $crate::descriptor::InstanceCell::from_raw(cell) });
            }
        }
    };
}
