//! FFI marshaling helpers.
//!
//! Everything that crosses the C boundary as a string or a handle array
//! goes through here, so the buffer-lifetime rules live in one place.

use std::ffi::{CStr, CString};
use std::ptr;

use libc::{c_char, size_t};
use llvm_sys::core::LLVMDisposeMessage;

/// Convert a host string to a NUL-terminated buffer for a native call.
///
/// Bind the result to a local so the buffer outlives the call; the `CString`
/// destructor then frees it on every exit path, including panics. An
/// interior NUL byte is a caller bug, not a runtime condition.
pub(crate) fn to_cstring(s: &str) -> CString {
    CString::new(s).expect("strings passed to LLVM must not contain interior nul bytes")
}

/// View a slice of raw handles as a native array pointer.
///
/// The native API disambiguates on null, so an empty slice must become a
/// null pointer, never a dangling non-null one.
pub(crate) fn raw_or_null<T>(raw: &mut [T]) -> *mut T {
    if raw.is_empty() {
        ptr::null_mut()
    } else {
        raw.as_mut_ptr()
    }
}

/// Copy a native message buffer into a host string and free the original.
///
/// A null pointer yields an empty string; some native failure paths report
/// status without a message.
///
/// # Safety
///
/// `message` must be null or a NUL-terminated buffer allocated by LLVM, and
/// must not be used after this call.
pub(crate) unsafe fn consume_message(message: *mut c_char) -> String {
    if message.is_null() {
        return String::new();
    }
    let copied = CStr::from_ptr(message).to_string_lossy().into_owned();
    LLVMDisposeMessage(message);
    copied
}

/// Free a native message buffer without copying it.
///
/// # Safety
///
/// Same contract as [`consume_message`].
pub(crate) unsafe fn dispose_message(message: *mut c_char) {
    if !message.is_null() {
        LLVMDisposeMessage(message);
    }
}

/// Copy a length-delimited native string into a host string.
///
/// # Safety
///
/// `ptr` must point to at least `len` readable bytes, or be null with a
/// `len` of zero.
pub(crate) unsafe fn bytes_to_string(ptr: *const c_char, len: size_t) -> String {
    if ptr.is_null() || len == 0 {
        return String::new();
    }
    let bytes = std::slice::from_raw_parts(ptr as *const u8, len);
    String::from_utf8_lossy(bytes).into_owned()
}
