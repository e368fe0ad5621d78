//! Pass manager handle.

use llvm_sys::core::{LLVMCreatePassManager, LLVMDisposePassManager, LLVMRunPassManager};
use llvm_sys::prelude::LLVMPassManagerRef;

use crate::module::Module;

/// A module-level pass pipeline.
///
/// Owns itself; running it borrows the module without taking ownership.
/// The legacy C API no longer exposes individual pass registration, so this
/// stays a thin create/run/dispose surface.
pub struct PassManager {
    raw: LLVMPassManagerRef,
}

impl PassManager {
    pub fn new() -> Self {
        PassManager {
            raw: unsafe { LLVMCreatePassManager() },
        }
    }

    /// Wrap a raw pass-manager reference, taking over the disposal duty.
    ///
    /// # Safety
    ///
    /// `raw` must be a live pass-manager reference that nothing else will
    /// dispose.
    pub unsafe fn from_raw(raw: LLVMPassManagerRef) -> Self {
        PassManager { raw }
    }

    pub fn as_raw(&self) -> LLVMPassManagerRef {
        self.raw
    }

    /// Run the scheduled passes over a module; true if any pass changed it.
    pub fn run(&self, module: &Module) -> bool {
        unsafe { LLVMRunPassManager(self.raw, module.as_raw()) != 0 }
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PassManager {
    fn drop(&mut self) {
        unsafe { LLVMDisposePassManager(self.raw) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn test_empty_pipeline_changes_nothing() {
        let context = Context::new();
        let module = context.create_module("untouched");
        let passes = PassManager::new();
        assert!(!passes.run(&module));
    }
}
