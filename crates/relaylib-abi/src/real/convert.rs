//! Numeric conversion slots over the pure engine in `relaylib_core`.

use std::ffi::{CStr, c_char, c_int, c_long};
use std::ptr;

use relaylib_core::convert;

pub(crate) unsafe extern "C" fn rl_atoi(s: *const c_char) -> c_int {
    if s.is_null() {
        return 0;
    }
    // SAFETY: s is NUL-terminated per contract.
    let bytes = unsafe { CStr::from_ptr(s) }.to_bytes();
    convert::atoi(bytes)
}

pub(crate) unsafe extern "C" fn rl_strtol(
    s: *const c_char,
    endp: *mut *mut c_char,
    base: c_int,
) -> c_long {
    if s.is_null() {
        if !endp.is_null() {
            // SAFETY: endp points at writable pointer storage per contract.
            unsafe { *endp = ptr::null_mut() };
        }
        return 0;
    }
    // SAFETY: s is NUL-terminated per contract.
    let bytes = unsafe { CStr::from_ptr(s) }.to_bytes();
    let parsed = convert::parse_signed(bytes, base);
    if !endp.is_null() {
        // SAFETY: consumed never exceeds the string length, so the offset
        // pointer stays inside the same allocation.
        unsafe { *endp = s.add(parsed.consumed).cast_mut() };
    }
    parsed.value as c_long
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strtol_reports_the_stop_position() {
        let s = c"  42xyz";
        let mut end: *mut c_char = ptr::null_mut();
        let v = unsafe { rl_strtol(s.as_ptr(), &mut end, 10) };
        assert_eq!(v, 42);
        let consumed = unsafe { end.offset_from(s.as_ptr()) };
        assert_eq!(consumed, 4);
    }

    #[test]
    fn strtol_with_bad_base_stops_at_the_start() {
        let s = c"123";
        let mut end: *mut c_char = ptr::null_mut();
        let v = unsafe { rl_strtol(s.as_ptr(), &mut end, 1) };
        assert_eq!(v, 0);
        assert_eq!(end.cast_const(), s.as_ptr());
    }
}
