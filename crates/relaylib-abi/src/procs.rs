//! Declarative roster of every relayed function.
//!
//! Each entry is either `proc` (fixed arity, every face generated by macro)
//! or `vararg` (a formatted-call adapter whose bootstrap and public faces
//! are written out in `varargs.rs`). The jump table struct, the bootstrap
//! stubs, the public forwarding stubs, the populate passes and the tracing
//! overlay are all expanded from this one list, so adding a function here
//! is the only step needed to grow the relay surface.

/// Invokes `$callback!` with the full slot roster.
///
/// Slot order is ABI: it fixes the field order of [`crate::table::JumpTable`]
/// and therefore the layout negotiated through the entry contract. New
/// entries go at the end, never in the middle.
macro_rules! for_each_api_proc {
    ($callback:ident) => {
        $callback! {
            proc fn rl_get_version() -> c_int;
            proc fn rl_get_revision() -> *const c_char;
            proc fn rl_malloc(size: usize) -> *mut c_void;
            proc fn rl_calloc(nmemb: usize, size: usize) -> *mut c_void;
            proc fn rl_realloc(ptr: *mut c_void, size: usize) -> *mut c_void;
            proc fn rl_free(ptr: *mut c_void);
            proc fn rl_memcpy(dst: *mut c_void, src: *const c_void, len: usize) -> *mut c_void;
            proc fn rl_memmove(dst: *mut c_void, src: *const c_void, len: usize) -> *mut c_void;
            proc fn rl_memset(dst: *mut c_void, value: c_int, len: usize) -> *mut c_void;
            proc fn rl_memcmp(a: *const c_void, b: *const c_void, len: usize) -> c_int;
            proc fn rl_strlen(s: *const c_char) -> usize;
            proc fn rl_strlcpy(dst: *mut c_char, src: *const c_char, maxlen: usize) -> usize;
            proc fn rl_strlcat(dst: *mut c_char, src: *const c_char, maxlen: usize) -> usize;
            proc fn rl_getenv(name: *const c_char) -> *const c_char;
            proc fn rl_setenv(name: *const c_char, value: *const c_char, overwrite: c_int) -> c_int;
            proc fn rl_unsetenv(name: *const c_char) -> c_int;
            proc fn rl_atoi(s: *const c_char) -> c_int;
            proc fn rl_strtol(s: *const c_char, endp: *mut *mut c_char, base: c_int) -> c_long;
            proc fn rl_get_error() -> *const c_char;
            proc fn rl_clear_error();
            proc fn rl_out_of_memory() -> c_int;
            proc fn rl_log_set_priority(priority: c_int);
            proc fn rl_log_get_priority() -> c_int;
            proc fn rl_log_message_v(priority: c_int, fmt: *const c_char, args: *const u64, nargs: usize);
            proc fn rl_vsnprintf(buf: *mut c_char, maxlen: usize, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
            proc fn rl_vasprintf(strp: *mut *mut c_char, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
            proc fn rl_vsscanf(input: *const c_char, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
            proc fn rl_vfdprintf(fd: c_int, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
            vararg fn rl_set_error(fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
            vararg fn rl_log(fmt: *const c_char, args: *const u64, nargs: usize);
            vararg fn rl_log_debug(fmt: *const c_char, args: *const u64, nargs: usize);
            vararg fn rl_log_info(fmt: *const c_char, args: *const u64, nargs: usize);
            vararg fn rl_log_warn(fmt: *const c_char, args: *const u64, nargs: usize);
            vararg fn rl_log_error(fmt: *const c_char, args: *const u64, nargs: usize);
            vararg fn rl_log_message(priority: c_int, fmt: *const c_char, args: *const u64, nargs: usize);
            vararg fn rl_sscanf(input: *const c_char, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
            vararg fn rl_snprintf(buf: *mut c_char, maxlen: usize, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
            vararg fn rl_asprintf(strp: *mut *mut c_char, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
            vararg fn rl_fdprintf(fd: c_int, fmt: *const c_char, args: *const u64, nargs: usize) -> c_int;
        }
    };
}
pub(crate) use for_each_api_proc;
