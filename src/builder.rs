//! Instruction builder handle.

use libc::c_uint;
use llvm_sys::core::{
    LLVMBuildAdd, LLVMBuildBr, LLVMBuildCall2, LLVMBuildCondBr, LLVMBuildICmp, LLVMBuildMul,
    LLVMBuildPhi, LLVMBuildRet, LLVMBuildRetVoid, LLVMBuildSDiv, LLVMBuildSRem, LLVMBuildSub,
    LLVMDisposeBuilder, LLVMPositionBuilderAtEnd,
};
use llvm_sys::prelude::{LLVMBuilderRef, LLVMValueRef};
use llvm_sys::LLVMIntPredicate;

use crate::marshal;
use crate::types::Type;
use crate::value::{BasicBlock, Value};

/// Integer comparison predicates for [`Builder::build_icmp`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IntPredicate {
    Eq,
    Ne,
    Ugt,
    Uge,
    Ult,
    Ule,
    Sgt,
    Sge,
    Slt,
    Sle,
}

impl IntPredicate {
    fn into_native(self) -> LLVMIntPredicate {
        match self {
            IntPredicate::Eq => LLVMIntPredicate::LLVMIntEQ,
            IntPredicate::Ne => LLVMIntPredicate::LLVMIntNE,
            IntPredicate::Ugt => LLVMIntPredicate::LLVMIntUGT,
            IntPredicate::Uge => LLVMIntPredicate::LLVMIntUGE,
            IntPredicate::Ult => LLVMIntPredicate::LLVMIntULT,
            IntPredicate::Ule => LLVMIntPredicate::LLVMIntULE,
            IntPredicate::Sgt => LLVMIntPredicate::LLVMIntSGT,
            IntPredicate::Sge => LLVMIntPredicate::LLVMIntSGE,
            IntPredicate::Slt => LLVMIntPredicate::LLVMIntSLT,
            IntPredicate::Sle => LLVMIntPredicate::LLVMIntSLE,
        }
    }
}

/// A cursor emitting instructions at a position inside a module.
///
/// The builder owns only itself; the instructions it emits belong to the
/// module. Drop a builder before the context it was created in.
pub struct Builder {
    raw: LLVMBuilderRef,
}

impl Builder {
    /// Wrap a raw builder reference, taking over the disposal duty.
    ///
    /// # Safety
    ///
    /// `raw` must be a live builder reference that nothing else will
    /// dispose.
    pub unsafe fn from_raw(raw: LLVMBuilderRef) -> Self {
        Builder { raw }
    }

    pub fn as_raw(&self) -> LLVMBuilderRef {
        self.raw
    }

    /// Park the cursor at the end of a block; subsequent instructions are
    /// appended there.
    pub fn position_at_end(&self, block: BasicBlock) {
        unsafe { LLVMPositionBuilderAtEnd(self.raw, block.as_raw()) }
    }

    pub fn build_ret(&self, value: Value) -> Value {
        unsafe { Value::from_raw(LLVMBuildRet(self.raw, value.as_raw())) }
    }

    pub fn build_ret_void(&self) -> Value {
        unsafe { Value::from_raw(LLVMBuildRetVoid(self.raw)) }
    }

    pub fn build_br(&self, dest: BasicBlock) -> Value {
        unsafe { Value::from_raw(LLVMBuildBr(self.raw, dest.as_raw())) }
    }

    pub fn build_cond_br(
        &self,
        condition: Value,
        then_block: BasicBlock,
        else_block: BasicBlock,
    ) -> Value {
        unsafe {
            Value::from_raw(LLVMBuildCondBr(
                self.raw,
                condition.as_raw(),
                then_block.as_raw(),
                else_block.as_raw(),
            ))
        }
    }

    pub fn build_add(&self, lhs: Value, rhs: Value, name: &str) -> Value {
        let cname = marshal::to_cstring(name);
        unsafe {
            Value::from_raw(LLVMBuildAdd(
                self.raw,
                lhs.as_raw(),
                rhs.as_raw(),
                cname.as_ptr(),
            ))
        }
    }

    pub fn build_sub(&self, lhs: Value, rhs: Value, name: &str) -> Value {
        let cname = marshal::to_cstring(name);
        unsafe {
            Value::from_raw(LLVMBuildSub(
                self.raw,
                lhs.as_raw(),
                rhs.as_raw(),
                cname.as_ptr(),
            ))
        }
    }

    pub fn build_mul(&self, lhs: Value, rhs: Value, name: &str) -> Value {
        let cname = marshal::to_cstring(name);
        unsafe {
            Value::from_raw(LLVMBuildMul(
                self.raw,
                lhs.as_raw(),
                rhs.as_raw(),
                cname.as_ptr(),
            ))
        }
    }

    pub fn build_sdiv(&self, lhs: Value, rhs: Value, name: &str) -> Value {
        let cname = marshal::to_cstring(name);
        unsafe {
            Value::from_raw(LLVMBuildSDiv(
                self.raw,
                lhs.as_raw(),
                rhs.as_raw(),
                cname.as_ptr(),
            ))
        }
    }

    pub fn build_srem(&self, lhs: Value, rhs: Value, name: &str) -> Value {
        let cname = marshal::to_cstring(name);
        unsafe {
            Value::from_raw(LLVMBuildSRem(
                self.raw,
                lhs.as_raw(),
                rhs.as_raw(),
                cname.as_ptr(),
            ))
        }
    }

    pub fn build_icmp(&self, predicate: IntPredicate, lhs: Value, rhs: Value, name: &str) -> Value {
        let cname = marshal::to_cstring(name);
        unsafe {
            Value::from_raw(LLVMBuildICmp(
                self.raw,
                predicate.into_native(),
                lhs.as_raw(),
                rhs.as_raw(),
                cname.as_ptr(),
            ))
        }
    }

    /// Call `callee` with `args`. `fn_type` is the callee's function type,
    /// recoverable via [`Value::global_value_type`]. Zero arguments marshal
    /// as a null array pointer.
    pub fn build_call(&self, fn_type: Type, callee: Value, args: &[Value], name: &str) -> Value {
        let cname = marshal::to_cstring(name);
        let mut raw_args: Vec<LLVMValueRef> = args.iter().map(|a| a.as_raw()).collect();
        unsafe {
            Value::from_raw(LLVMBuildCall2(
                self.raw,
                fn_type.as_raw(),
                callee.as_raw(),
                marshal::raw_or_null(&mut raw_args),
                args.len() as c_uint,
                cname.as_ptr(),
            ))
        }
    }

    /// An empty phi node of the given type; attach edges with
    /// [`Value::add_incoming`].
    pub fn build_phi(&self, ty: Type, name: &str) -> Value {
        let cname = marshal::to_cstring(name);
        unsafe { Value::from_raw(LLVMBuildPhi(self.raw, ty.as_raw(), cname.as_ptr())) }
    }
}

impl Drop for Builder {
    fn drop(&mut self) {
        unsafe { LLVMDisposeBuilder(self.raw) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::module::VerifierFailureAction;

    #[test]
    fn test_build_arithmetic_and_ret() {
        let context = Context::new();
        let module = context.create_module("arith");
        let builder = context.create_builder();
        let i64_type = context.i64_type();

        let fn_type = Type::function(i64_type, &[i64_type, i64_type], false);
        let function = module.add_function("mix", fn_type);
        let entry = context.append_basic_block(function, "entry");
        builder.position_at_end(entry);

        let a = function.param(0);
        let b = function.param(1);
        let sum = builder.build_add(a, b, "sum");
        let diff = builder.build_sub(sum, b, "diff");
        let product = builder.build_mul(diff, a, "product");
        builder.build_ret(product);

        module
            .verify(VerifierFailureAction::ReturnStatus)
            .expect("arithmetic module verifies");

        let ir = module.print_to_string();
        assert!(ir.contains("add i64"));
        assert!(ir.contains("mul i64"));
    }

    #[test]
    fn test_build_branches_and_phi() {
        let context = Context::new();
        let module = context.create_module("control");
        let builder = context.create_builder();
        let i64_type = context.i64_type();

        let fn_type = Type::function(i64_type, &[i64_type], false);
        let function = module.add_function("clamp_negative", fn_type);
        let entry = context.append_basic_block(function, "entry");
        let negative = context.append_basic_block(function, "negative");
        let done = context.append_basic_block(function, "done");

        builder.position_at_end(entry);
        let zero = Value::const_int(i64_type, 0, false);
        let is_negative = builder.build_icmp(IntPredicate::Slt, function.param(0), zero, "is_neg");
        builder.build_cond_br(is_negative, negative, done);

        builder.position_at_end(negative);
        builder.build_br(done);

        builder.position_at_end(done);
        let result = builder.build_phi(i64_type, "result");
        result.add_incoming(&[function.param(0), zero], &[entry, negative]);
        builder.build_ret(result);

        module
            .verify(VerifierFailureAction::ReturnStatus)
            .expect("phi module verifies");
    }
}
