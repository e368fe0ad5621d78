//! Execution engine, backend selection, and boxed scalar values.
//!
//! The engine is where module ownership changes hands: a successful
//! construction absorbs the module, a failed one hands it back. See
//! [`ExecutionEngine::for_module`] for the exact rules.

use std::fmt;
use std::ptr;

use libc::{c_uint, c_void};
use llvm_sys::execution_engine::{
    LLVMAddGlobalMapping, LLVMCreateGenericValueOfInt, LLVMCreateInterpreterForModule,
    LLVMCreateJITCompilerForModule, LLVMDisposeExecutionEngine, LLVMDisposeGenericValue,
    LLVMExecutionEngineRef, LLVMGenericValueRef, LLVMGenericValueToInt, LLVMRunFunction,
};
use llvm_sys::prelude::LLVMBool;
use log::{debug, trace};

use crate::error::Error;
use crate::marshal;
use crate::module::Module;
use crate::types::Type;
use crate::value::Value;

/// Which native execution backend to construct.
///
/// The interpreter runs IR directly and only needs
/// [`link_in_interpreter`](crate::link_in_interpreter); the JIT compiles to
/// machine code and needs [`link_in_mcjit`](crate::link_in_mcjit) plus an
/// initialized native target. Which one fits is a per-call configuration
/// choice, not something the binding decides.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EngineBackend {
    Interpreter,
    Jit { opt_level: u32 },
}

/// Engine construction failed; the module goes back to its owner.
///
/// Holding the module here is what keeps the failure path honest: the
/// caller can retry with another backend or simply let it drop, which
/// releases it. Converting into [`Error`] (for example via `?`) drops the
/// module as well, keeping only the diagnostic.
#[derive(Debug)]
pub struct CreateEngineError {
    /// The module, returned intact to the caller.
    pub module: Module,
    /// The native diagnostic describing the failure.
    pub message: String,
}

impl fmt::Display for CreateEngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "execution engine creation failed: {}", self.message)
    }
}

impl std::error::Error for CreateEngineError {}

impl From<CreateEngineError> for Error {
    fn from(err: CreateEngineError) -> Self {
        Error::EngineCreation(err.message)
    }
}

/// A native interpreter or JIT bound to exactly one absorbed module.
pub struct ExecutionEngine {
    raw: LLVMExecutionEngineRef,
}

impl ExecutionEngine {
    /// Construct an engine for `module` on the chosen backend.
    ///
    /// On success the engine absorbs the module: the caller keeps no
    /// disposing handle, and dropping the engine releases both. On failure
    /// the module comes back inside [`CreateEngineError`], still owned by
    /// the caller, along with the native diagnostic.
    pub fn for_module(
        module: Module,
        backend: EngineBackend,
    ) -> std::result::Result<Self, CreateEngineError> {
        let mut raw: LLVMExecutionEngineRef = ptr::null_mut();
        let mut message = ptr::null_mut();
        let failed = unsafe {
            match backend {
                EngineBackend::Interpreter => {
                    LLVMCreateInterpreterForModule(&mut raw, module.as_raw(), &mut message)
                }
                EngineBackend::Jit { opt_level } => LLVMCreateJITCompilerForModule(
                    &mut raw,
                    module.as_raw(),
                    opt_level as c_uint,
                    &mut message,
                ),
            }
        } != 0;

        if failed {
            let message = unsafe { marshal::consume_message(message) };
            debug!("engine creation failed, module stays with the caller: {message}");
            Err(CreateEngineError { module, message })
        } else {
            // The engine owns the module now; disposing through the module
            // handle as well would double-free.
            let absorbed = module.into_raw();
            trace!("module {absorbed:?} absorbed by execution engine");
            Ok(ExecutionEngine { raw })
        }
    }

    /// Construct an interpreter engine; shorthand for
    /// [`for_module`](Self::for_module) with [`EngineBackend::Interpreter`].
    pub fn interpreter(module: Module) -> std::result::Result<Self, CreateEngineError> {
        Self::for_module(module, EngineBackend::Interpreter)
    }

    /// Wrap a raw engine reference, taking over the disposal duty.
    ///
    /// # Safety
    ///
    /// `raw` must be a live engine reference that nothing else will
    /// dispose.
    pub unsafe fn from_raw(raw: LLVMExecutionEngineRef) -> Self {
        ExecutionEngine { raw }
    }

    pub fn as_raw(&self) -> LLVMExecutionEngineRef {
        self.raw
    }

    /// Run a function from the absorbed module with boxed arguments.
    ///
    /// Zero arguments marshal as a null array pointer. The caller owns the
    /// returned boxed result.
    pub fn run_function(&self, function: Value, args: &[GenericValue]) -> GenericValue {
        let mut raw_args: Vec<LLVMGenericValueRef> = args.iter().map(|a| a.as_raw()).collect();
        unsafe {
            GenericValue::from_raw(LLVMRunFunction(
                self.raw,
                function.as_raw(),
                args.len() as c_uint,
                marshal::raw_or_null(&mut raw_args),
            ))
        }
    }

    /// Map a global in the absorbed module to an arbitrary host address.
    ///
    /// # Safety
    ///
    /// `address` must point to storage matching the global's type and must
    /// stay valid for as long as the engine can reach it.
    pub unsafe fn add_global_mapping(&self, global: Value, address: *mut c_void) {
        LLVMAddGlobalMapping(self.raw, global.as_raw(), address)
    }
}

impl Drop for ExecutionEngine {
    fn drop(&mut self) {
        // Also releases the absorbed module.
        unsafe { LLVMDisposeExecutionEngine(self.raw) }
    }
}

/// A boxed scalar crossing the host/native call boundary.
///
/// Signedness is not stored in the box: the flag passed when reading the
/// value back must match the one used when boxing it, and getting that
/// wrong is silently the caller's problem, not a detectable error.
pub struct GenericValue {
    raw: LLVMGenericValueRef,
}

impl GenericValue {
    /// Box an integer of the given type.
    pub fn from_int(ty: Type, value: u64, is_signed: bool) -> Self {
        unsafe {
            GenericValue::from_raw(LLVMCreateGenericValueOfInt(
                ty.as_raw(),
                value,
                is_signed as LLVMBool,
            ))
        }
    }

    /// Unbox as an integer, re-stating the signedness used when boxing.
    pub fn to_int(&self, is_signed: bool) -> u64 {
        unsafe { LLVMGenericValueToInt(self.raw, is_signed as LLVMBool) }
    }

    /// Wrap a raw generic-value reference, taking over the disposal duty.
    ///
    /// # Safety
    ///
    /// `raw` must be a live generic-value reference that nothing else will
    /// dispose.
    pub unsafe fn from_raw(raw: LLVMGenericValueRef) -> Self {
        GenericValue { raw }
    }

    pub fn as_raw(&self) -> LLVMGenericValueRef {
        self.raw
    }
}

impl Drop for GenericValue {
    fn drop(&mut self) {
        unsafe { LLVMDisposeGenericValue(self.raw) }
    }
}
