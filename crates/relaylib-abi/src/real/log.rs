//! Logging slots.
//!
//! One process-wide priority threshold; messages below it are dropped
//! before rendering. Output is composed by the pure helper in
//! `relaylib_core::log` and written to the standard error descriptor.

use std::ffi::{c_char, c_int};
use std::sync::atomic::{AtomicI32, Ordering};

use relaylib_core::log::{DEFAULT_PRIORITY, PRIORITY_INFO, Priority};

use super::stdio;

/// Rendered log text is cut here before composing the line.
pub(crate) const LOG_LINE_LEN: usize = 512;

static THRESHOLD: AtomicI32 = AtomicI32::new(DEFAULT_PRIORITY);

pub(crate) unsafe extern "C" fn rl_log_set_priority(priority: c_int) {
    THRESHOLD.store(Priority::from_raw(priority).as_raw(), Ordering::Relaxed);
}

pub(crate) unsafe extern "C" fn rl_log_get_priority() -> c_int {
    THRESHOLD.load(Ordering::Relaxed)
}

pub(crate) unsafe extern "C" fn rl_log_message_v(
    priority: c_int,
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) {
    if priority < THRESHOLD.load(Ordering::Relaxed) {
        return;
    }
    // SAFETY: pack contract passes through from the slot caller.
    let Some(text) = (unsafe { stdio::render_pack(fmt, args, nargs) }) else {
        return;
    };
    emit(priority, &text);
}

fn emit(priority: c_int, text: &[u8]) {
    let shown = &text[..text.len().min(LOG_LINE_LEN)];
    let mut line = Vec::with_capacity(shown.len() + 32);
    relaylib_core::log::compose_line(Priority::from_raw(priority), shown, &mut line);
    // SAFETY: valid buffer and length for the write syscall.
    let _ = unsafe { libc::write(2, line.as_ptr().cast(), line.len()) };
}

/// Overlay hook: one traced line per relayed call, subject to the same
/// threshold as any INFO message.
#[cfg(feature = "call-logging")]
pub(crate) fn trace(name: &str) {
    if PRIORITY_INFO < THRESHOLD.load(Ordering::Relaxed) {
        return;
    }
    let mut text = Vec::with_capacity(name.len() + 5);
    text.extend_from_slice(b"CALL ");
    text.extend_from_slice(name.as_bytes());
    emit(PRIORITY_INFO, &text);
}

// ---------------------------------------------------------------------------
// Formatted faces (fixed by the adapters, direct here)
// ---------------------------------------------------------------------------

pub(crate) unsafe extern "C" fn rl_log(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract as the primitive.
    unsafe { rl_log_message_v(PRIORITY_INFO, fmt, args, nargs) }
}

pub(crate) unsafe extern "C" fn rl_log_debug(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract as the primitive.
    unsafe { rl_log_message_v(relaylib_core::log::PRIORITY_DEBUG, fmt, args, nargs) }
}

pub(crate) unsafe extern "C" fn rl_log_info(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract as the primitive.
    unsafe { rl_log_message_v(PRIORITY_INFO, fmt, args, nargs) }
}

pub(crate) unsafe extern "C" fn rl_log_warn(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract as the primitive.
    unsafe { rl_log_message_v(relaylib_core::log::PRIORITY_WARN, fmt, args, nargs) }
}

pub(crate) unsafe extern "C" fn rl_log_error(fmt: *const c_char, args: *const u64, nargs: usize) {
    // SAFETY: same contract as the primitive.
    unsafe { rl_log_message_v(relaylib_core::log::PRIORITY_ERROR, fmt, args, nargs) }
}

pub(crate) unsafe extern "C" fn rl_log_message(
    priority: c_int,
    fmt: *const c_char,
    args: *const u64,
    nargs: usize,
) {
    // SAFETY: same contract as the primitive.
    unsafe { rl_log_message_v(priority, fmt, args, nargs) }
}
