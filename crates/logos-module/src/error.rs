//! Error types for module loading.
//!
//! These errors never cross the crate boundary directly: the loading path
//! flattens them into a handle's error string, and every other operation
//! degrades to a sentinel (empty sequence, `None`, `false`) instead of
//! failing.

/// Result type for the fallible loading internals.
pub type Result<T> = std::result::Result<T, ModuleError>;

/// Module loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The dynamic loader could not resolve the binary.
    #[error("Failed to load module: {0}")]
    LoadFailed(String),

    /// The binary carries no module descriptor symbol.
    #[error("Missing module entry point: {0}")]
    MissingEntryPoint(String),

    /// The descriptor was built against a different ABI.
    #[error("Module ABI mismatch: expected {expected}, found {found}")]
    AbiMismatch { expected: u32, found: u32 },

    /// The module's create entry point returned null.
    #[error("Module instantiation failed: {0}")]
    InstantiationFailed(String),
}
