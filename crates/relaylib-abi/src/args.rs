//! Argument-pack builders for the formatted-call symbols.
//!
//! Formatted calls carry their arguments as a counted slice of `u64` words,
//! one word per conversion in the format string. Integers are stored
//! sign-extended, floats as their bit pattern, pointers as addresses; the
//! renderer narrows each word according to the conversion and length
//! modifier it lands on.

use std::ffi::c_char;

/// Most words a single pack may carry; renderers ignore anything past this.
pub const MAX_PACK_ARGS: usize = 32;

/// Pack word for `%d`/`%i` with default width.
pub fn arg_i32(value: i32) -> u64 {
    value as i64 as u64
}

/// Pack word for `%ld`/`%lld`.
pub fn arg_i64(value: i64) -> u64 {
    value as u64
}

/// Pack word for `%u`, `%o`, `%x` with default width.
pub fn arg_u32(value: u32) -> u64 {
    u64::from(value)
}

/// Pack word for `%lu`/`%llu` and friends.
pub fn arg_u64(value: u64) -> u64 {
    value
}

/// Pack word for `%zu`.
pub fn arg_usize(value: usize) -> u64 {
    value as u64
}

/// Pack word for the float conversions; the renderer rebuilds the `f64`
/// from the stored bit pattern.
pub fn arg_f64(value: f64) -> u64 {
    value.to_bits()
}

/// Pack word for `%c`.
pub fn arg_char(value: u8) -> u64 {
    u64::from(value)
}

/// Pack word for `%p` or an output pointer in a scan pack.
pub fn arg_ptr<T>(ptr: *const T) -> u64 {
    ptr as usize as u64
}

/// Pack word for `%s`; the renderer treats the word as a NUL-terminated
/// string address.
pub fn arg_cstr(ptr: *const c_char) -> u64 {
    ptr as usize as u64
}
