//! Allocator and byte/string primitives.
//!
//! Allocation goes through the platform allocator with success counters on
//! top; the counters are what let tests assert the adapter tier behavior
//! without hooking the allocator itself.

use std::ffi::{c_char, c_int, c_void};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

static HEAP_ALLOCS: AtomicUsize = AtomicUsize::new(0);
static HEAP_RELEASES: AtomicUsize = AtomicUsize::new(0);

pub(crate) unsafe extern "C" fn rl_malloc(size: usize) -> *mut c_void {
    // Zero-size requests still hand back a unique pointer.
    let size = size.max(1);
    // SAFETY: plain allocation request.
    let out = unsafe { libc::malloc(size) };
    if !out.is_null() {
        HEAP_ALLOCS.fetch_add(1, Ordering::Relaxed);
    }
    out
}

pub(crate) unsafe extern "C" fn rl_calloc(nmemb: usize, size: usize) -> *mut c_void {
    let Some(total) = nmemb.checked_mul(size) else {
        return ptr::null_mut();
    };
    // SAFETY: plain zeroed allocation request.
    let out = unsafe { libc::calloc(1, total.max(1)) };
    if !out.is_null() {
        HEAP_ALLOCS.fetch_add(1, Ordering::Relaxed);
    }
    out
}

pub(crate) unsafe extern "C" fn rl_realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    let was_null = ptr.is_null();
    // SAFETY: ptr is null or came from this allocator per the call contract.
    let out = unsafe { libc::realloc(ptr, size.max(1)) };
    if was_null && !out.is_null() {
        HEAP_ALLOCS.fetch_add(1, Ordering::Relaxed);
    }
    out
}

pub(crate) unsafe extern "C" fn rl_free(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: ptr came from this allocator per the call contract.
    unsafe { libc::free(ptr) };
    HEAP_RELEASES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) unsafe extern "C" fn rl_memcpy(
    dst: *mut c_void,
    src: *const c_void,
    len: usize,
) -> *mut c_void {
    if len == 0 {
        return dst;
    }
    // SAFETY: non-overlapping regions of at least len bytes per contract.
    unsafe { libc::memcpy(dst, src, len) }
}

pub(crate) unsafe extern "C" fn rl_memmove(
    dst: *mut c_void,
    src: *const c_void,
    len: usize,
) -> *mut c_void {
    if len == 0 {
        return dst;
    }
    // SAFETY: regions of at least len bytes per contract; overlap allowed.
    unsafe { libc::memmove(dst, src, len) }
}

pub(crate) unsafe extern "C" fn rl_memset(
    dst: *mut c_void,
    value: c_int,
    len: usize,
) -> *mut c_void {
    if len == 0 {
        return dst;
    }
    // SAFETY: dst spans at least len bytes per contract.
    unsafe { libc::memset(dst, value, len) }
}

pub(crate) unsafe extern "C" fn rl_memcmp(a: *const c_void, b: *const c_void, len: usize) -> c_int {
    if len == 0 {
        return 0;
    }
    // SAFETY: both regions span at least len bytes per contract.
    unsafe { libc::memcmp(a, b, len) }
}

pub(crate) unsafe extern "C" fn rl_strlen(s: *const c_char) -> usize {
    // SAFETY: s is NUL-terminated per contract.
    unsafe { libc::strlen(s) }
}

pub(crate) unsafe extern "C" fn rl_strlcpy(
    dst: *mut c_char,
    src: *const c_char,
    maxlen: usize,
) -> usize {
    // SAFETY: src is NUL-terminated per contract.
    let srclen = unsafe { libc::strlen(src) };
    if maxlen > 0 {
        let copy = srclen.min(maxlen - 1);
        // SAFETY: dst spans at least copy+1 bytes per contract.
        unsafe {
            ptr::copy_nonoverlapping(src, dst, copy);
            *dst.add(copy) = 0;
        }
    }
    srclen
}

pub(crate) unsafe extern "C" fn rl_strlcat(
    dst: *mut c_char,
    src: *const c_char,
    maxlen: usize,
) -> usize {
    // SAFETY: both strings are NUL-terminated per contract.
    let dstlen = unsafe { libc::strlen(dst) };
    let srclen = unsafe { libc::strlen(src) };
    if dstlen < maxlen {
        // SAFETY: the tail of dst spans maxlen - dstlen bytes per contract.
        unsafe { rl_strlcpy(dst.add(dstlen), src, maxlen - dstlen) };
    }
    dstlen + srclen
}

/// Successful acquisitions through this allocator so far in this process.
pub fn heap_alloc_count_for_tests() -> usize {
    HEAP_ALLOCS.load(Ordering::Relaxed)
}

/// Successful releases through this allocator so far in this process.
pub fn heap_release_count_for_tests() -> usize {
    HEAP_RELEASES.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calloc_rejects_element_overflow() {
        let p = unsafe { rl_calloc(usize::MAX, 2) };
        assert!(p.is_null());
    }

    #[test]
    fn alloc_and_release_move_the_counters() {
        let before_a = heap_alloc_count_for_tests();
        let before_r = heap_release_count_for_tests();
        let p = unsafe { rl_malloc(64) };
        assert!(!p.is_null());
        unsafe { rl_free(p) };
        assert_eq!(heap_alloc_count_for_tests(), before_a + 1);
        assert_eq!(heap_release_count_for_tests(), before_r + 1);
    }

    #[test]
    fn strlcpy_truncates_and_reports_source_length() {
        let mut dst = [0x7Fu8; 8];
        let n = unsafe { rl_strlcpy(dst.as_mut_ptr().cast(), c"hello world".as_ptr(), 8) };
        assert_eq!(n, 11);
        assert_eq!(&dst[..8], b"hello w\0");
    }

    #[test]
    fn strlcat_appends_within_capacity() {
        let mut dst = [0u8; 16];
        dst[..3].copy_from_slice(b"ab\0");
        let n = unsafe { rl_strlcat(dst.as_mut_ptr().cast(), c"cdef".as_ptr(), 16) };
        assert_eq!(n, 6);
        assert_eq!(&dst[..7], b"abcdef\0");
    }

    #[test]
    fn strlcat_with_full_destination_only_reports() {
        let mut dst = *b"full\0xxx";
        let n = unsafe { rl_strlcat(dst.as_mut_ptr().cast(), c"more".as_ptr(), 4) };
        // dstlen >= maxlen: nothing written, total still reported.
        assert_eq!(n, 8);
        assert_eq!(&dst[..5], b"full\0");
    }
}
