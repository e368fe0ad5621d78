//! Context handle.

use libc::c_uint;
use llvm_sys::core::{
    LLVMAppendBasicBlockInContext, LLVMContextCreate, LLVMContextDispose,
    LLVMCreateBuilderInContext, LLVMDoubleTypeInContext, LLVMFloatTypeInContext,
    LLVMInt1TypeInContext, LLVMInt32TypeInContext, LLVMInt64TypeInContext, LLVMInt8TypeInContext,
    LLVMIntTypeInContext, LLVMModuleCreateWithNameInContext, LLVMStructTypeInContext,
    LLVMVoidTypeInContext,
};
use llvm_sys::prelude::{LLVMBool, LLVMContextRef, LLVMTypeRef};

use crate::builder::Builder;
use crate::marshal;
use crate::module::Module;
use crate::types::Type;
use crate::value::{BasicBlock, Value};

/// The top-level isolation domain owning types and values.
///
/// Everything created in a context (modules, builders, and every `Type` and
/// `Value` reachable from them) must be dropped before the context itself;
/// the context's disposal tears the whole graph down and leaves any
/// surviving view handle dangling. A context and its graph must not be
/// mutated from more than one thread without external synchronization.
pub struct Context {
    raw: LLVMContextRef,
}

impl Context {
    pub fn new() -> Self {
        Context {
            raw: unsafe { LLVMContextCreate() },
        }
    }

    /// Wrap a raw context reference, taking over the disposal duty.
    ///
    /// # Safety
    ///
    /// `raw` must be a live context reference that nothing else will
    /// dispose.
    pub unsafe fn from_raw(raw: LLVMContextRef) -> Self {
        Context { raw }
    }

    pub fn as_raw(&self) -> LLVMContextRef {
        self.raw
    }

    /// Create a named module inside this context.
    pub fn create_module(&self, name: &str) -> Module {
        let cname = marshal::to_cstring(name);
        unsafe { Module::from_raw(LLVMModuleCreateWithNameInContext(cname.as_ptr(), self.raw)) }
    }

    /// Create an instruction builder bound to this context.
    pub fn create_builder(&self) -> Builder {
        unsafe { Builder::from_raw(LLVMCreateBuilderInContext(self.raw)) }
    }

    /// Append a named basic block to the end of a function.
    pub fn append_basic_block(&self, function: Value, name: &str) -> BasicBlock {
        let cname = marshal::to_cstring(name);
        unsafe {
            BasicBlock::from_raw(LLVMAppendBasicBlockInContext(
                self.raw,
                function.as_raw(),
                cname.as_ptr(),
            ))
        }
    }

    pub fn bool_type(&self) -> Type {
        unsafe { Type::from_raw(LLVMInt1TypeInContext(self.raw)) }
    }

    pub fn i8_type(&self) -> Type {
        unsafe { Type::from_raw(LLVMInt8TypeInContext(self.raw)) }
    }

    pub fn i32_type(&self) -> Type {
        unsafe { Type::from_raw(LLVMInt32TypeInContext(self.raw)) }
    }

    pub fn i64_type(&self) -> Type {
        unsafe { Type::from_raw(LLVMInt64TypeInContext(self.raw)) }
    }

    /// An integer type of arbitrary bit width.
    pub fn int_type(&self, bits: u32) -> Type {
        unsafe { Type::from_raw(LLVMIntTypeInContext(self.raw, bits as c_uint)) }
    }

    pub fn f32_type(&self) -> Type {
        unsafe { Type::from_raw(LLVMFloatTypeInContext(self.raw)) }
    }

    pub fn f64_type(&self) -> Type {
        unsafe { Type::from_raw(LLVMDoubleTypeInContext(self.raw)) }
    }

    pub fn void_type(&self) -> Type {
        unsafe { Type::from_raw(LLVMVoidTypeInContext(self.raw)) }
    }

    /// An anonymous struct type over the given element types.
    pub fn struct_type(&self, elements: &[Type], packed: bool) -> Type {
        let mut raw_elements: Vec<LLVMTypeRef> = elements.iter().map(|t| t.as_raw()).collect();
        unsafe {
            Type::from_raw(LLVMStructTypeInContext(
                self.raw,
                marshal::raw_or_null(&mut raw_elements),
                elements.len() as c_uint,
                packed as LLVMBool,
            ))
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe { LLVMContextDispose(self.raw) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_drop() {
        let context = Context::new();
        assert!(!context.as_raw().is_null());
    }

    #[test]
    fn test_struct_type_construction() {
        let context = Context::new();
        let pair = context.struct_type(&[context.i64_type(), context.i64_type()], false);
        assert_eq!(pair.print_to_string(), "{ i64, i64 }");

        let unit = context.struct_type(&[], false);
        assert_eq!(unit.print_to_string(), "{}");
    }

    #[test]
    fn test_module_created_in_context() {
        let context = Context::new();
        let module = context.create_module("in_context");
        assert!(!module.as_raw().is_null());
    }
}
