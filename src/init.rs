//! One-time native initialization.
//!
//! Target registration and backend linking are process-global in LLVM.
//! Each entry point here runs its native call at most once per process and
//! caches the outcome; repeat calls return the cached result instead of
//! re-running the native setup.

use std::sync::{Once, OnceLock};

use llvm_sys::execution_engine::{LLVMLinkInInterpreter, LLVMLinkInMCJIT};
use llvm_sys::target::{LLVM_InitializeNativeAsmPrinter, LLVM_InitializeNativeTarget};
use log::debug;

use crate::error::{Error, Result};

/// Register the code-generation target for the host architecture.
pub fn initialize_native_target() -> Result<()> {
    static OUTCOME: OnceLock<Result<()>> = OnceLock::new();
    OUTCOME
        .get_or_init(|| {
            if unsafe { LLVM_InitializeNativeTarget() } != 0 {
                Err(Error::NativeTargetInit)
            } else {
                debug!("native target initialized");
                Ok(())
            }
        })
        .clone()
}

/// Register the assembly printer for the host architecture.
pub fn initialize_native_asm_printer() -> Result<()> {
    static OUTCOME: OnceLock<Result<()>> = OnceLock::new();
    OUTCOME
        .get_or_init(|| {
            if unsafe { LLVM_InitializeNativeAsmPrinter() } != 0 {
                Err(Error::NativeAsmPrinterInit)
            } else {
                debug!("native asm printer initialized");
                Ok(())
            }
        })
        .clone()
}

/// Make the interpreter backend available to engine construction.
pub fn link_in_interpreter() {
    static LINKED: Once = Once::new();
    LINKED.call_once(|| {
        unsafe { LLVMLinkInInterpreter() };
        debug!("interpreter backend linked in");
    });
}

/// Make the MCJIT backend available to engine construction.
pub fn link_in_mcjit() {
    static LINKED: Once = Once::new();
    LINKED.call_once(|| {
        unsafe { LLVMLinkInMCJIT() };
        debug!("mcjit backend linked in");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_is_idempotent() {
        // First and repeat calls agree; the native setup runs once.
        let first = initialize_native_target();
        assert_eq!(first, initialize_native_target());

        let first = initialize_native_asm_printer();
        assert_eq!(first, initialize_native_asm_printer());

        link_in_interpreter();
        link_in_interpreter();
    }
}
