//! Per-thread error message slots.
//!
//! Each thread owns one fixed buffer; `rl_set_error` renders into it
//! (truncating) and `rl_get_error` hands out the buffer pointer, valid for
//! the thread's lifetime. An empty buffer reads as "no error".

use std::cell::UnsafeCell;
use std::ffi::{c_char, c_int};

use super::stdio;

pub(crate) const ERROR_BUF_LEN: usize = 512;

thread_local! {
    static ERROR_BUF: UnsafeCell<[u8; ERROR_BUF_LEN]> =
        const { UnsafeCell::new([0; ERROR_BUF_LEN]) };
}

pub(crate) unsafe extern "C" fn rl_set_error(
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: pack contract passes through from the slot caller.
    let rendered = unsafe { stdio::render_pack(fmt, args, nargs) };
    ERROR_BUF.with(|cell| {
        // SAFETY: the buffer is only touched from its own thread.
        let buf = unsafe { &mut *cell.get() };
        match rendered {
            Some(text) => {
                let n = text.len().min(ERROR_BUF_LEN - 1);
                buf[..n].copy_from_slice(&text[..n]);
                buf[n] = 0;
            }
            None => buf[0] = 0,
        }
    });
    -1
}

pub(crate) unsafe extern "C" fn rl_get_error() -> *const c_char {
    ERROR_BUF.with(|cell| cell.get().cast::<c_char>().cast_const())
}

pub(crate) unsafe extern "C" fn rl_clear_error() {
    ERROR_BUF.with(|cell| {
        // SAFETY: the buffer is only touched from its own thread.
        unsafe { (*cell.get())[0] = 0 };
    });
}

pub(crate) unsafe extern "C" fn rl_out_of_memory() -> c_int {
    const MESSAGE: &[u8] = b"Out of memory\0";
    ERROR_BUF.with(|cell| {
        // SAFETY: the buffer is only touched from its own thread.
        let buf = unsafe { &mut *cell.get() };
        buf[..MESSAGE.len()].copy_from_slice(MESSAGE);
    });
    -1
}
