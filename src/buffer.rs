//! Memory buffer handle.

use std::path::Path;
use std::ptr;
use std::slice;

use libc::c_char;
use llvm_sys::core::{
    LLVMCreateMemoryBufferWithContentsOfFile, LLVMCreateMemoryBufferWithMemoryRangeCopy,
    LLVMDisposeMemoryBuffer, LLVMGetBufferSize, LLVMGetBufferStart,
};
use llvm_sys::prelude::LLVMMemoryBufferRef;

use crate::error::{Error, Result};
use crate::marshal;

/// A read-only byte region owned by the native layer.
#[derive(Debug)]
pub struct MemoryBuffer {
    raw: LLVMMemoryBufferRef,
}

impl MemoryBuffer {
    /// Copy a host byte slice into a named native buffer.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Self {
        let cname = marshal::to_cstring(name);
        unsafe {
            MemoryBuffer::from_raw(LLVMCreateMemoryBufferWithMemoryRangeCopy(
                bytes.as_ptr() as *const c_char,
                bytes.len(),
                cname.as_ptr(),
            ))
        }
    }

    /// Read a file into a native buffer.
    pub fn from_file(path: &Path) -> Result<Self> {
        let path = path
            .to_str()
            .ok_or_else(|| Error::MemoryBuffer("path is not valid UTF-8".to_string()))?;
        let cpath = marshal::to_cstring(path);

        let mut raw: LLVMMemoryBufferRef = ptr::null_mut();
        let mut message = ptr::null_mut();
        let failed = unsafe {
            LLVMCreateMemoryBufferWithContentsOfFile(cpath.as_ptr(), &mut raw, &mut message)
        } != 0;

        if failed {
            Err(Error::MemoryBuffer(unsafe {
                marshal::consume_message(message)
            }))
        } else {
            Ok(unsafe { MemoryBuffer::from_raw(raw) })
        }
    }

    /// Wrap a raw buffer reference, taking over the disposal duty.
    ///
    /// # Safety
    ///
    /// `raw` must be a live buffer reference that nothing else will
    /// dispose.
    pub unsafe fn from_raw(raw: LLVMMemoryBufferRef) -> Self {
        MemoryBuffer { raw }
    }

    pub fn as_raw(&self) -> LLVMMemoryBufferRef {
        self.raw
    }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            let start = LLVMGetBufferStart(self.raw) as *const u8;
            let len = LLVMGetBufferSize(self.raw);
            if len == 0 {
                return &[];
            }
            slice::from_raw_parts(start, len)
        }
    }

    pub fn len(&self) -> usize {
        unsafe { LLVMGetBufferSize(self.raw) }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for MemoryBuffer {
    fn drop(&mut self) {
        unsafe { LLVMDisposeMemoryBuffer(self.raw) }
    }
}
