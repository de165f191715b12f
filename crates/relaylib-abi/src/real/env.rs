//! Process environment access.
//!
//! Thin forwarding to the platform environment with the argument checks the
//! C entry points promise. `rl_getenv` hands out pointers into the
//! environment block itself, so callers treat them as invalidated by the
//! next mutation, same as the platform contract.

use std::ffi::{CStr, c_char, c_int};
use std::ptr;

pub(crate) unsafe extern "C" fn rl_getenv(name: *const c_char) -> *const c_char {
    if name.is_null() {
        return ptr::null();
    }
    // SAFETY: name is NUL-terminated per contract.
    unsafe { libc::getenv(name) }.cast_const()
}

pub(crate) unsafe extern "C" fn rl_setenv(
    name: *const c_char,
    value: *const c_char,
    overwrite: c_int,
) -> c_int {
    // SAFETY: pointer checks precede every dereference; strings are
    // NUL-terminated per contract.
    unsafe {
        if name.is_null() || *name == 0 || value.is_null() {
            return -1;
        }
        if !libc::strchr(name, c_int::from(b'=')).is_null() {
            return -1;
        }
        if libc::setenv(name, value, overwrite) == 0 { 0 } else { -1 }
    }
}

pub(crate) unsafe extern "C" fn rl_unsetenv(name: *const c_char) -> c_int {
    // SAFETY: pointer checks precede every dereference.
    unsafe {
        if name.is_null() || *name == 0 {
            return -1;
        }
        if !libc::strchr(name, c_int::from(b'=')).is_null() {
            return -1;
        }
        if libc::unsetenv(name) == 0 { 0 } else { -1 }
    }
}

/// Init-time environment read that never routes through the table.
pub(crate) fn raw_env(name: &CStr) -> *const c_char {
    // SAFETY: valid NUL-terminated name.
    unsafe { libc::getenv(name.as_ptr()) }.cast_const()
}
