use thiserror::Error;

/// Errors surfaced by the binding layer.
///
/// Every recoverable native failure is translated into one of these at the
/// boundary; call sites never see raw status codes or out-parameter message
/// pointers. Contract violations (mismatched phi arrays, interior NUL bytes
/// in names) panic instead of returning a variant, since they indicate a
/// caller bug rather than a runtime condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Execution-engine construction failed. Carries the native diagnostic;
    /// the module involved stays with its original owner.
    #[error("execution engine creation failed: {0}")]
    EngineCreation(String),

    /// Module verification failed. The diagnostic is only populated under
    /// the `ReturnStatus` policy; the other policies report outside the
    /// error channel.
    #[error("module verification failed: {0}")]
    Verification(String),

    /// The native code-generation target for this host could not be
    /// registered. The native layer offers no further detail.
    #[error("failed to initialize native target")]
    NativeTargetInit,

    /// The native assembly printer could not be registered.
    #[error("failed to initialize native asm printer")]
    NativeAsmPrinterInit,

    /// A memory buffer could not be created, usually because the backing
    /// file is missing or unreadable.
    #[error("memory buffer creation failed: {0}")]
    MemoryBuffer(String),
}

pub type Result<T> = std::result::Result<T, Error>;
