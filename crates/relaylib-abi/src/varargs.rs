//! Hand-specified faces for the formatted-call slots.
//!
//! Every face shares one body with its `_bootstrap` twin; the only
//! difference is that the bootstrap face runs first-use initialization
//! before dispatching. Bodies never touch an implementation directly: they
//! go through the live table (`slot!`), so an override module installed by
//! negotiation sees exactly the calls it expects.
//!
//! The error and logging faces materialize their pack before forwarding:
//! render into a stack buffer, fall back to one table-allocated heap buffer
//! when the text does not fit, then forward the rendered text as a `"%s"`
//! pack and release the heap buffer before returning. The scanning and
//! buffer-output faces forward their pack untouched; their target primitive
//! already owns the destination, so there is nothing to stage.

use std::ffi::{c_char, c_int};
use std::ptr;

use relaylib_core::log::{
    PRIORITY_DEBUG, PRIORITY_ERROR, PRIORITY_INFO, PRIORITY_WARN,
};

use crate::args::arg_cstr;

/// Stack tier of the materializing adapters, in bytes including the NUL.
pub const ADAPTER_STACK_BUF: usize = 128;

cfg_if::cfg_if! {
    if #[cfg(feature = "dynamic-api")] {
        macro_rules! slot {
            ($name:ident) => { (crate::table::table_ref().$name) };
        }
    } else {
        macro_rules! slot {
            ($name:ident) => { (crate::real::$name) };
        }
    }
}

/// Render a pack through the table's own formatting slots and hand the
/// text to `consume`. Stack tier first; one heap tier when the rendered
/// length reports it did not fit; nothing at all when rendering fails.
///
/// # Safety
///
/// Pack contract: `fmt` NUL-terminated, `args` spans `nargs` words.
unsafe fn with_rendered(
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
    consume: impl FnOnce(*const c_char),
) {
    let mut buf = [0u8; ADAPTER_STACK_BUF];
    // SAFETY: buf spans ADAPTER_STACK_BUF bytes; pack contract passes
    // through from the caller.
    let needed = unsafe {
        slot!(rl_vsnprintf)(
            buf.as_mut_ptr().cast(),
            ADAPTER_STACK_BUF,
            fmt,
            args,
            nargs,
        )
    };
    if needed < 0 {
        return;
    }
    if (needed as usize) < ADAPTER_STACK_BUF {
        consume(buf.as_ptr().cast());
        return;
    }

    let mut heap: *mut c_char = ptr::null_mut();
    // SAFETY: heap receives the allocation; pack contract passes through.
    let rendered = unsafe { slot!(rl_vasprintf)(&mut heap, fmt, args, nargs) };
    if rendered >= 0 && !heap.is_null() {
        consume(heap.cast_const());
        // SAFETY: heap came from the table allocator.
        unsafe { slot!(rl_free)(heap.cast()) };
    }
}

// ---------------------------------------------------------------------------
// Adapter bodies
// ---------------------------------------------------------------------------

unsafe fn set_error_body(fmt: *const c_char, args: *const u64, nargs: usize) -> c_int {
    // SAFETY: pack contract passes through from the face.
    unsafe {
        with_rendered(fmt, args, nargs, |text| {
            let fwd = [arg_cstr(text)];
            // SAFETY: "%s" with one string word is a well-formed pack.
            unsafe { slot!(rl_set_error)(c"%s".as_ptr(), fwd.as_ptr(), 1) };
        });
    }
    -1
}

unsafe fn log_message_body(priority: c_int, fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: pack contract passes through from the face.
    unsafe {
        with_rendered(fmt, args, nargs, |text| {
            let fwd = [arg_cstr(text)];
            // SAFETY: "%s" with one string word is a well-formed pack.
            unsafe { slot!(rl_log_message_v)(priority, c"%s".as_ptr(), fwd.as_ptr(), 1) };
        });
    }
}

unsafe fn log_body(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract.
    unsafe { log_message_body(PRIORITY_INFO, fmt, args, nargs) }
}

unsafe fn log_debug_body(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract.
    unsafe { log_message_body(PRIORITY_DEBUG, fmt, args, nargs) }
}

unsafe fn log_info_body(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract.
    unsafe { log_message_body(PRIORITY_INFO, fmt, args, nargs) }
}

unsafe fn log_warn_body(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract.
    unsafe { log_message_body(PRIORITY_WARN, fmt, args, nargs) }
}

unsafe fn log_error_body(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract.
    unsafe { log_message_body(PRIORITY_ERROR, fmt, args, nargs) }
}

unsafe fn sscanf_body(
    input: *const c_char,
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: pack contract passes through from the face.
    unsafe { slot!(rl_vsscanf)(input, fmt, args, nargs) }
}

unsafe fn snprintf_body(
    buf: *mut c_char,
    maxlen: usize,
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: pack contract passes through from the face.
    unsafe { slot!(rl_vsnprintf)(buf, maxlen, fmt, args, nargs) }
}

unsafe fn asprintf_body(
    strp: *mut *mut c_char,
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: pack contract passes through from the face.
    unsafe { slot!(rl_vasprintf)(strp, fmt, args, nargs) }
}

unsafe fn fdprintf_body(
    fd: c_int,
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: pack contract passes through from the face.
    unsafe { slot!(rl_vfdprintf)(fd, fmt, args, nargs) }
}

// ---------------------------------------------------------------------------
// Face generation
// ---------------------------------------------------------------------------

/// Expand the bootstrap and public face pair for each formatted-call slot.
macro_rules! vararg_faces {
    ($(fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)? = $body:ident;)*) => {
        paste::paste! {
            $(
                #[cfg(feature = "dynamic-api")]
                pub(crate) unsafe extern "C" fn [<$name _bootstrap>]($($arg: $ty),*) $(-> $ret)? {
                    crate::init::ensure_initialized();
                    // SAFETY: pack contract passes through from the caller.
                    unsafe { $body($($arg),*) }
                }

                #[unsafe(no_mangle)]
                pub unsafe extern "C" fn $name($($arg: $ty),*) $(-> $ret)? {
                    // SAFETY: pack contract passes through from the caller.
                    unsafe { $body($($arg),*) }
                }
            )*
        }
    };
}

vararg_faces! {
    fn rl_set_error(fmt: *const c_char, args: *const u64, nargs: usize) -> c_int = set_error_body;
    fn rl_log(fmt: *const c_char, args: *const u64, nargs: usize) = log_body;
    fn rl_log_debug(fmt: *const c_char, args: *const u64, nargs: usize) = log_debug_body;
    fn rl_log_info(fmt: *const c_char, args: *const u64, nargs: usize) = log_info_body;
    fn rl_log_warn(fmt: *const c_char, args: *const u64, nargs: usize) = log_warn_body;
    fn rl_log_error(fmt: *const c_char, args: *const u64, nargs: usize) = log_error_body;
    fn rl_log_message(priority: c_int, fmt: *const c_char, args: *const u64, nargs: usize) = log_message_body;
    fn rl_sscanf(input: *const c_char, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int = sscanf_body;
    fn rl_snprintf(buf: *mut c_char, maxlen: usize, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int = snprintf_body;
    fn rl_asprintf(strp: *mut *mut c_char, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int = asprintf_body;
    fn rl_fdprintf(fd: c_int, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int = fdprintf_body;
}
