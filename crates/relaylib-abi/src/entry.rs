//! The entry contract.
//!
//! `rl_relay_entry` is the fixed negotiation symbol: a caller hands over
//! the contract version it was built against, a table buffer, and that
//! buffer's size in bytes. On success the buffer holds a fully populated
//! table. The exported symbol carries no first-use guard: a host process
//! negotiates before any public symbol has run, and that negotiation must
//! not trigger or wait on initialization.

use std::ffi::c_void;

#[cfg(feature = "dynamic-api")]
use crate::table::{self, JumpTable};

/// Negotiation accepted; the caller's buffer is populated.
pub const ENTRY_OK: i32 = 0;
/// Caller speaks a different contract version.
pub const ENTRY_INCOMPATIBLE_VERSION: i32 = -1;
/// Caller's table is larger than this build can fill.
pub const ENTRY_TABLE_TOO_LARGE: i32 = -2;

#[cfg(feature = "call-logging")]
pub(crate) const LOG_CALLS_ENV_C: &std::ffi::CStr = c"RELAYLIB_LOG_CALLS";

/// True when the trace toggle asks for the overlay table.
#[cfg(feature = "call-logging")]
fn trace_requested() -> bool {
    let value = crate::real::env::raw_env(LOG_CALLS_ENV_C);
    if value.is_null() {
        return false;
    }
    // SAFETY: environment values are NUL-terminated.
    let bytes = unsafe { std::ffi::CStr::from_ptr(value) }.to_bytes();
    relaylib_core::convert::atoi(bytes) != 0
}

/// Populate our own table, then copy it out when the caller negotiated
/// into a different buffer.
///
/// A caller that declares a smaller table than ours gets exactly the bytes
/// it declared. That truncation is the compatibility story for callers
/// built against an older, shorter layout, so it stays a plain byte copy
/// with no per-slot checking.
#[cfg(feature = "dynamic-api")]
pub(crate) fn initialize_table(version: u32, table: *mut c_void, table_size: u32) -> i32 {
    if version != crate::RELAY_API_VERSION {
        return ENTRY_INCOMPATIBLE_VERSION;
    }
    let wanted = table_size as usize;
    if wanted > table::table_size() {
        return ENTRY_TABLE_TOO_LARGE;
    }

    let own = table::table_mut_ptr();
    // SAFETY: single-writer window per the table protocol (the guarded
    // init section, or an entry call made before first use).
    unsafe {
        let slots = &mut *own;
        #[cfg(feature = "call-logging")]
        if trace_requested() {
            table::populate_overlay(slots);
            crate::init::note_overlay_active();
        } else {
            table::populate_real(slots);
        }
        #[cfg(not(feature = "call-logging"))]
        table::populate_real(slots);
    }

    let dest = table.cast::<JumpTable>();
    if !dest.is_null() && dest != own {
        // Copy through the just-populated slot so even this step dispatches
        // the same way callers will.
        // SAFETY: dest spans table_size bytes per the entry contract and
        // the slot holds a live memcpy implementation.
        unsafe {
            (table::table_ref().rl_memcpy)(dest.cast(), own.cast_const().cast(), wanted);
        }
    }
    ENTRY_OK
}

#[cfg(feature = "dynamic-api")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rl_relay_entry(version: u32, table: *mut c_void, table_size: u32) -> i32 {
    initialize_table(version, table, table_size)
}

#[cfg(not(feature = "dynamic-api"))]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rl_relay_entry(
    _version: u32,
    _table: *mut c_void,
    _table_size: u32,
) -> i32 {
    ENTRY_INCOMPATIBLE_VERSION
}

#[cfg(all(test, feature = "call-logging"))]
mod tests {
    use super::*;

    #[test]
    fn trace_env_constant_matches_the_published_name() {
        assert_eq!(LOG_CALLS_ENV_C.to_str(), Ok(crate::RELAY_LOG_CALLS_ENV));
    }
}
