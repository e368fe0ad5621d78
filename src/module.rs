//! Module handle and verification.

use std::ptr;

use libc::c_char;
use llvm_sys::analysis::{LLVMVerifierFailureAction, LLVMVerifyModule};
use llvm_sys::core::{
    LLVMAddFunction, LLVMDisposeModule, LLVMDumpModule, LLVMGetNamedFunction,
    LLVMPrintModuleToString,
};
use llvm_sys::prelude::LLVMModuleRef;
use log::debug;

use crate::error::{Error, Result};
use crate::marshal;
use crate::types::Type;
use crate::value::Value;

/// What the native verifier does when it finds a broken module.
///
/// Chosen at each call site, never hard-coded: `AbortProcess` kills the
/// process and `PrintMessage` writes to stderr, both outside the error
/// channel. Only `ReturnStatus` yields a clean, recoverable error carrying
/// the diagnostic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VerifierFailureAction {
    /// Print the diagnostic to stderr and abort the process.
    AbortProcess,
    /// Print the diagnostic to stderr and return the failure status.
    PrintMessage,
    /// Just return the failure status, with the diagnostic in the error.
    ReturnStatus,
}

impl VerifierFailureAction {
    fn into_native(self) -> LLVMVerifierFailureAction {
        match self {
            VerifierFailureAction::AbortProcess => {
                LLVMVerifierFailureAction::LLVMAbortProcessAction
            }
            VerifierFailureAction::PrintMessage => {
                LLVMVerifierFailureAction::LLVMPrintMessageAction
            }
            VerifierFailureAction::ReturnStatus => {
                LLVMVerifierFailureAction::LLVMReturnStatusAction
            }
        }
    }
}

/// A compilation unit holding functions and globals.
///
/// A module owns itself until it is absorbed by an
/// [`ExecutionEngine`](crate::ExecutionEngine); see
/// [`ExecutionEngine::for_module`](crate::ExecutionEngine::for_module) for
/// the transfer rules. Drop a module before the context it was created in.
#[derive(Debug, PartialEq, Eq)]
pub struct Module {
    raw: LLVMModuleRef,
}

impl Module {
    /// Wrap a raw module reference, taking over the disposal duty.
    ///
    /// # Safety
    ///
    /// `raw` must be a live module reference that nothing else will
    /// dispose.
    pub unsafe fn from_raw(raw: LLVMModuleRef) -> Self {
        Module { raw }
    }

    pub fn as_raw(&self) -> LLVMModuleRef {
        self.raw
    }

    /// Surrender the raw reference without disposing it.
    ///
    /// After this call the wrapper no longer releases the module; whoever
    /// holds the returned reference carries the disposal duty.
    pub fn into_raw(self) -> LLVMModuleRef {
        let raw = self.raw;
        std::mem::forget(self);
        raw
    }

    /// Declare or define a function of the given type.
    pub fn add_function(&self, name: &str, fn_type: Type) -> Value {
        let cname = marshal::to_cstring(name);
        unsafe { Value::from_raw(LLVMAddFunction(self.raw, cname.as_ptr(), fn_type.as_raw())) }
    }

    /// Look up a function by name; `None` when no such function exists.
    pub fn named_function(&self, name: &str) -> Option<Value> {
        let cname = marshal::to_cstring(name);
        let raw = unsafe { LLVMGetNamedFunction(self.raw, cname.as_ptr()) };
        if raw.is_null() {
            None
        } else {
            Some(unsafe { Value::from_raw(raw) })
        }
    }

    /// Print the module's textual IR to stderr.
    pub fn dump(&self) {
        unsafe { LLVMDumpModule(self.raw) }
    }

    /// Render the module's textual IR into a host-owned string.
    pub fn print_to_string(&self) -> String {
        unsafe { marshal::consume_message(LLVMPrintModuleToString(self.raw)) }
    }

    /// Run the native verifier over the module.
    ///
    /// The diagnostic buffer is only requested under `ReturnStatus`; for the
    /// other actions the native layer reports through its own channels and
    /// the returned error carries an empty message.
    pub fn verify(&self, action: VerifierFailureAction) -> Result<()> {
        let mut message: *mut c_char = ptr::null_mut();
        let want_message = action == VerifierFailureAction::ReturnStatus;
        let out = if want_message {
            &mut message as *mut *mut c_char
        } else {
            ptr::null_mut()
        };

        let broken = unsafe { LLVMVerifyModule(self.raw, action.into_native(), out) } != 0;
        if broken {
            let diagnostic = unsafe { marshal::consume_message(message) };
            debug!("module verification failed: {diagnostic}");
            Err(Error::Verification(diagnostic))
        } else {
            // The verifier writes an (empty) message even on success; free
            // it without inspecting it.
            unsafe { marshal::dispose_message(message) };
            Ok(())
        }
    }
}

impl Drop for Module {
    fn drop(&mut self) {
        unsafe { LLVMDisposeModule(self.raw) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn test_named_function_lookup() {
        let context = Context::new();
        let module = context.create_module("lookup");
        let fn_type = Type::function(context.void_type(), &[], false);
        module.add_function("present", fn_type);

        let found = module.named_function("present").expect("function exists");
        assert_eq!(found.name(), "present");
        assert!(module.named_function("missing").is_none());
    }

    #[test]
    fn test_print_empty_module() {
        let context = Context::new();
        let module = context.create_module("printable");
        let ir = module.print_to_string();
        assert!(ir.contains("printable"));
    }

    #[test]
    fn test_verify_ok_module() {
        let context = Context::new();
        let module = context.create_module("sound");
        module
            .verify(VerifierFailureAction::ReturnStatus)
            .expect("empty module verifies");
    }

    #[test]
    fn test_verify_broken_module_returns_status() {
        let context = Context::new();
        let module = context.create_module("broken");
        let fn_type = Type::function(context.void_type(), &[], false);
        let function = module.add_function("no_terminator", fn_type);
        context.append_basic_block(function, "entry");

        let err = module
            .verify(VerifierFailureAction::ReturnStatus)
            .unwrap_err();
        match err {
            Error::Verification(diagnostic) => assert!(!diagnostic.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_repeated_create_dispose_cycles() {
        for i in 0..64 {
            let context = Context::new();
            let module = context.create_module(&format!("cycle_{i}"));
            drop(module);
        }
    }
}
