//! Value and basic-block handles.
//!
//! Both are views: a `Value` belongs to its module or context and a
//! `BasicBlock` to its parent function. Neither is ever released on its
//! own; validity ends when the owner is dropped, which the binding cannot
//! check after the fact.

use std::ptr;

use libc::{c_uint, size_t};
use llvm_sys::core::{
    LLVMAddIncoming, LLVMConstInt, LLVMCountParams, LLVMGetBasicBlockParent, LLVMGetParam,
    LLVMGetParams, LLVMGetValueName2, LLVMGlobalGetValueType, LLVMSetValueName2, LLVMTypeOf,
};
use llvm_sys::prelude::{LLVMBasicBlockRef, LLVMBool, LLVMValueRef};

use crate::marshal;
use crate::types::Type;

/// A function, parameter, instruction, or constant reference.
///
/// Copies alias the same native entity; equality is identity of the
/// underlying reference.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Value {
    raw: LLVMValueRef,
}

impl Value {
    /// Wrap a raw value reference, which may be null.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a live value reference whose owning module or
    /// context outlives every use of the wrapper.
    pub unsafe fn from_raw(raw: LLVMValueRef) -> Self {
        Value { raw }
    }

    pub fn as_raw(self) -> LLVMValueRef {
        self.raw
    }

    /// Whether this wraps a null native reference.
    ///
    /// The safe constructors never produce one, but raw interop can; a null
    /// value must not be passed to any other operation.
    pub fn is_null(self) -> bool {
        self.raw.is_null()
    }

    /// An integer constant of the given type.
    pub fn const_int(ty: Type, value: u64, sign_extend: bool) -> Value {
        unsafe {
            Value::from_raw(LLVMConstInt(
                ty.as_raw(),
                value,
                sign_extend as LLVMBool,
            ))
        }
    }

    pub fn type_of(self) -> Type {
        unsafe { Type::from_raw(LLVMTypeOf(self.raw)) }
    }

    /// The value type of a global, e.g. the function type of a function.
    ///
    /// Under opaque pointers `type_of` on a function yields `ptr`; this is
    /// the way to recover the signature for a call.
    pub fn global_value_type(self) -> Type {
        unsafe { Type::from_raw(LLVMGlobalGetValueType(self.raw)) }
    }

    /// Set the value's name. The empty string is a real name, not "unnamed".
    pub fn set_name(self, name: &str) {
        let cname = marshal::to_cstring(name);
        unsafe { LLVMSetValueName2(self.raw, cname.as_ptr(), name.len() as size_t) }
    }

    /// Read the value's name back, byte-exact, empty if unnamed.
    pub fn name(self) -> String {
        let mut len: size_t = 0;
        unsafe {
            let ptr = LLVMGetValueName2(self.raw, &mut len);
            marshal::bytes_to_string(ptr, len)
        }
    }

    /// Number of parameters of a function value.
    pub fn params_count(self) -> u32 {
        unsafe { LLVMCountParams(self.raw) }
    }

    /// All parameters of a function value, in declaration order.
    pub fn params(self) -> Vec<Value> {
        let count = self.params_count() as usize;
        if count == 0 {
            return Vec::new();
        }
        let mut raw: Vec<LLVMValueRef> = vec![ptr::null_mut(); count];
        unsafe { LLVMGetParams(self.raw, raw.as_mut_ptr()) };
        raw.into_iter()
            .map(|r| unsafe { Value::from_raw(r) })
            .collect()
    }

    /// The parameter at `index` of a function value.
    pub fn param(self, index: u32) -> Value {
        unsafe { Value::from_raw(LLVMGetParam(self.raw, index as c_uint)) }
    }

    /// Attach incoming (value, predecessor-block) edges to a phi node.
    ///
    /// `values` and `blocks` must have the same length; a mismatch is a
    /// caller bug and panics rather than truncating or reading past either
    /// slice.
    pub fn add_incoming(self, values: &[Value], blocks: &[BasicBlock]) {
        assert_eq!(
            values.len(),
            blocks.len(),
            "phi incoming values and blocks must have the same length"
        );
        if values.is_empty() {
            return;
        }
        let mut raw_values: Vec<LLVMValueRef> = values.iter().map(|v| v.as_raw()).collect();
        let mut raw_blocks: Vec<LLVMBasicBlockRef> = blocks.iter().map(|b| b.as_raw()).collect();
        unsafe {
            LLVMAddIncoming(
                self.raw,
                raw_values.as_mut_ptr(),
                raw_blocks.as_mut_ptr(),
                values.len() as c_uint,
            )
        }
    }
}

/// An ordered instruction container inside a function.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BasicBlock {
    raw: LLVMBasicBlockRef,
}

impl BasicBlock {
    /// Wrap a raw basic-block reference.
    ///
    /// # Safety
    ///
    /// `raw` must be a live basic-block reference whose parent function
    /// outlives every use of the wrapper.
    pub unsafe fn from_raw(raw: LLVMBasicBlockRef) -> Self {
        BasicBlock { raw }
    }

    pub fn as_raw(self) -> LLVMBasicBlockRef {
        self.raw
    }

    /// The function this block belongs to.
    pub fn parent(self) -> Value {
        unsafe { Value::from_raw(LLVMGetBasicBlockParent(self.raw)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_const_int_type() {
        let context = Context::new();
        let i64_type = context.i64_type();
        let forty_two = Value::const_int(i64_type, 42, true);
        assert!(!forty_two.is_null());
        assert_eq!(forty_two.type_of(), i64_type);
    }

    #[test]
    fn test_param_name_round_trip() {
        let context = Context::new();
        let module = context.create_module("names");
        let i64_type = context.i64_type();
        let fn_type = Type::function(i64_type, &[i64_type], false);
        let function = module.add_function("id", fn_type);

        let param = function.param(0);
        assert_eq!(param.name(), "");

        param.set_name("lhs");
        assert_eq!(param.name(), "lhs");

        // Empty sets and reads back as empty, not as "absent".
        param.set_name("");
        assert_eq!(param.name(), "");
    }

    #[test]
    fn test_params_match_indexed_lookup() {
        let context = Context::new();
        let module = context.create_module("params");
        let i64_type = context.i64_type();
        let fn_type = Type::function(i64_type, &[i64_type, i64_type, i64_type], false);
        let function = module.add_function("three", fn_type);

        assert_eq!(function.params_count(), 3);
        let params = function.params();
        assert_eq!(params.len(), 3);
        for (i, param) in params.iter().enumerate() {
            assert_eq!(*param, function.param(i as u32));
        }
    }

    #[test]
    fn test_zero_param_function_has_no_params() {
        let context = Context::new();
        let module = context.create_module("no_params");
        let fn_type = Type::function(context.void_type(), &[], false);
        let function = module.add_function("nullary", fn_type);

        assert_eq!(function.params_count(), 0);
        assert!(function.params().is_empty());
    }

    #[test]
    fn test_basic_block_parent() {
        let context = Context::new();
        let module = context.create_module("blocks");
        let fn_type = Type::function(context.void_type(), &[], false);
        let function = module.add_function("f", fn_type);
        let entry = context.append_basic_block(function, "entry");
        assert_eq!(entry.parent(), function);
    }
}
