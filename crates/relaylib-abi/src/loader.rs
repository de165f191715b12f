//! Override module loading.
//!
//! The override list is snapshotted out of the environment once, at first
//! use, then each candidate is mapped and probed for the entry symbol. A
//! handle that resolves the symbol is never closed again: the negotiated
//! table points into the mapped module for the rest of the process.

use std::ffi::{CStr, CString, c_void};

/// Entry-contract function resolved from a candidate module.
pub(crate) type EntryFn = unsafe extern "C" fn(u32, *mut c_void, u32) -> i32;

pub(crate) const OVERRIDE_ENV_C: &CStr = c"RELAYLIB_DYNAMIC_API";
pub(crate) const ENTRY_SYMBOL_C: &CStr = c"rl_relay_entry";

/// Longest override list honored, terminator included. Anything longer
/// reads as unset.
pub(crate) const CANDIDATE_LIST_MAX: usize = 512;

/// Snapshot the override list, or None when it is unset, empty, or over
/// the length cap. The copy means later environment mutation cannot pull
/// the bytes out from under the candidate scan.
pub(crate) fn read_override_list() -> Option<Vec<u8>> {
    let value = crate::real::env::raw_env(OVERRIDE_ENV_C);
    if value.is_null() {
        return None;
    }
    // SAFETY: environment values are NUL-terminated.
    let bytes = unsafe { CStr::from_ptr(value) }.to_bytes();
    if bytes.is_empty() || bytes.len() >= CANDIDATE_LIST_MAX {
        return None;
    }
    Some(bytes.to_vec())
}

/// Split a snapshotted list into candidate names, dropping empty pieces.
pub(crate) fn candidates(list: &[u8]) -> impl Iterator<Item = CString> + '_ {
    list.split(|&b| b == b',')
        .filter(|piece| !piece.is_empty())
        .filter_map(|piece| CString::new(piece).ok())
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// Map the candidate and resolve the entry symbol. On a resolve
        /// miss the handle is closed before moving on; on a hit it stays
        /// open for the life of the process.
        pub(crate) fn load_candidate(name: &CStr) -> Option<EntryFn> {
            // SAFETY: both names are NUL-terminated; the symbol, once
            // resolved, has the entry-contract signature by definition of
            // the contract.
            unsafe {
                let handle = libc::dlopen(name.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL);
                if handle.is_null() {
                    return None;
                }
                let sym = libc::dlsym(handle, ENTRY_SYMBOL_C.as_ptr());
                if sym.is_null() {
                    libc::dlclose(handle);
                    return None;
                }
                Some(std::mem::transmute::<*mut c_void, EntryFn>(sym))
            }
        }
    } else {
        pub(crate) fn load_candidate(_name: &CStr) -> Option<EntryFn> {
            None
        }
    }
}
