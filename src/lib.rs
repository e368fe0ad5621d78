//! smiddy - safe handles over the LLVM-C API
//!
//! The wee forge: hammer oot native code withoot burnin' yer fingers.
//!
//! This crate wraps the LLVM-C entry points from `llvm-sys` in handle types
//! that carry the ownership rules the C API only documents:
//!
//! - [`Context`], [`Module`], [`Builder`], [`ExecutionEngine`],
//!   [`GenericValue`], [`PassManager`], and [`MemoryBuffer`] own their
//!   native resource and release it exactly once, when dropped.
//! - [`Type`], [`Value`], and [`BasicBlock`] are copyable views owned by
//!   their parent context or module and are never released on their own.
//! - Constructing an execution engine moves the module in; on success the
//!   engine absorbs it, on failure the error hands it back. Double-free is
//!   unrepresentable in safe code.
//!
//! What the native library does with the handles - code generation,
//! optimization, verification, interpretation - is entirely its own
//! business; this crate only makes the boundary safe to hold.
//!
//! # Example
//!
//! ```no_run
//! use smiddy::{Context, ExecutionEngine, GenericValue, Type, VerifierFailureAction};
//!
//! fn main() -> smiddy::Result<()> {
//!     smiddy::link_in_interpreter();
//!     smiddy::initialize_native_target()?;
//!     smiddy::initialize_native_asm_printer()?;
//!
//!     let context = Context::new();
//!     let module = context.create_module("demo");
//!     let builder = context.create_builder();
//!
//!     let i64_type = context.i64_type();
//!     let fn_type = Type::function(i64_type, &[i64_type, i64_type], false);
//!     let function = module.add_function("sum", fn_type);
//!     let entry = context.append_basic_block(function, "entry");
//!     builder.position_at_end(entry);
//!     let total = builder.build_add(function.param(0), function.param(1), "total");
//!     builder.build_ret(total);
//!
//!     module.verify(VerifierFailureAction::ReturnStatus)?;
//!
//!     let engine = ExecutionEngine::interpreter(module)?;
//!     let args = [
//!         GenericValue::from_int(i64_type, 10, true),
//!         GenericValue::from_int(i64_type, 32, true),
//!     ];
//!     let result = engine.run_function(function, &args);
//!     assert_eq!(result.to_int(true), 42);
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod builder;
pub mod context;
pub mod engine;
pub mod error;
pub mod init;
mod marshal;
pub mod module;
pub mod passes;
pub mod types;
pub mod value;

pub use buffer::MemoryBuffer;
pub use builder::{Builder, IntPredicate};
pub use context::Context;
pub use engine::{CreateEngineError, EngineBackend, ExecutionEngine, GenericValue};
pub use error::{Error, Result};
pub use init::{
    initialize_native_asm_printer, initialize_native_target, link_in_interpreter, link_in_mcjit,
};
pub use module::{Module, VerifierFailureAction};
pub use passes::PassManager;
pub use types::Type;
pub use value::{BasicBlock, Value};
