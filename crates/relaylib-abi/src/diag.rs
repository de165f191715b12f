//! One-way diagnostics for first-use initialization.
//!
//! Warnings raised while the table is being negotiated cannot go through
//! the logging slots (those are mid-rewrite at that point), so they are
//! written straight to the standard error descriptor. The counter and the
//! last-message cell exist so tests can observe what was raised without
//! scraping stderr.

use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

static WARN_COUNT: AtomicUsize = AtomicUsize::new(0);
static LAST_WARN: Mutex<Option<String>> = Mutex::new(None);

pub(crate) fn warn(message: &str) {
    let line = format!("relaylib: {message}\n");
    // SAFETY: valid buffer and length for the write syscall.
    let _ = unsafe { libc::write(2, line.as_ptr().cast(), line.len()) };
    WARN_COUNT.fetch_add(1, Ordering::Relaxed);
    *LAST_WARN.lock() = Some(message.to_owned());
}

pub(crate) fn warn_candidate_unloadable(name: &CStr) {
    warn(&format!(
        "could not load override module \"{}\" named in {}; trying the next candidate",
        name.to_string_lossy(),
        crate::RELAY_OVERRIDE_ENV,
    ));
}

pub(crate) fn warn_candidate_rejected(name: &CStr, code: i32) {
    warn(&format!(
        "override module \"{}\" named in {} did not accept the entry contract (code {}); trying the next candidate",
        name.to_string_lossy(),
        crate::RELAY_OVERRIDE_ENV,
        code,
    ));
}

/// Last-resort exit: the in-crate populate pass failed, so no public symbol
/// can ever dispatch.
pub(crate) fn fatal(message: &str) -> ! {
    let line = format!("relaylib: {message}\n");
    // SAFETY: valid buffer and length for the write syscall.
    let _ = unsafe { libc::write(2, line.as_ptr().cast(), line.len()) };
    // SAFETY: terminates the process; no further obligations.
    unsafe { libc::_exit(crate::RELAY_FATAL_EXIT_CODE) }
}

/// Number of initialization warnings raised so far in this process.
pub fn warn_count_for_tests() -> usize {
    WARN_COUNT.load(Ordering::Relaxed)
}

/// Text of the most recent warning, without the `relaylib:` prefix.
pub fn last_warn_for_tests() -> Option<String> {
    LAST_WARN.lock().clone()
}
