//! Type handles.
//!
//! A `Type` is a view into shape descriptors owned by a `Context`; it is
//! never released on its own and stays valid only as long as its context.

use libc::c_uint;
use llvm_sys::core::{
    LLVMFunctionType, LLVMGetIntTypeWidth, LLVMPointerType, LLVMPrintTypeToString,
};
use llvm_sys::prelude::{LLVMBool, LLVMTypeRef};

use crate::marshal;

/// A value-shape descriptor owned by its parent [`Context`](crate::Context).
///
/// Copies of a `Type` all alias the same native descriptor; equality is
/// identity of that descriptor.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Type {
    raw: LLVMTypeRef,
}

impl Type {
    /// Wrap a raw type reference.
    ///
    /// # Safety
    ///
    /// `raw` must be a live type reference whose owning context outlives
    /// every use of the wrapper.
    pub unsafe fn from_raw(raw: LLVMTypeRef) -> Self {
        Type { raw }
    }

    pub fn as_raw(self) -> LLVMTypeRef {
        self.raw
    }

    /// Build a function type from a return type and parameter types.
    ///
    /// Zero parameters marshal as a null array pointer, which is how the
    /// native layer spells "no parameters".
    pub fn function(return_type: Type, params: &[Type], is_var_arg: bool) -> Type {
        let mut raw_params: Vec<LLVMTypeRef> = params.iter().map(|t| t.as_raw()).collect();
        unsafe {
            Type::from_raw(LLVMFunctionType(
                return_type.raw,
                marshal::raw_or_null(&mut raw_params),
                params.len() as c_uint,
                is_var_arg as LLVMBool,
            ))
        }
    }

    /// Build a pointer type in the given address space.
    pub fn pointer(element: Type, address_space: u32) -> Type {
        unsafe { Type::from_raw(LLVMPointerType(element.raw, address_space as c_uint)) }
    }

    /// Bit width of an integer type.
    ///
    /// Calling this on a non-integer type is a caller bug; the native layer
    /// does not check.
    pub fn int_width(self) -> u32 {
        unsafe { LLVMGetIntTypeWidth(self.raw) }
    }

    /// Render the type the way the native printer spells it, e.g. `i64`.
    pub fn print_to_string(self) -> String {
        unsafe { marshal::consume_message(LLVMPrintTypeToString(self.raw)) }
    }
}
