//! Version slots.

use std::ffi::{c_char, c_int};

const fn parse_component(s: &str) -> c_int {
    let bytes = s.as_bytes();
    let mut value: c_int = 0;
    let mut i = 0;
    while i < bytes.len() {
        value = value * 10 + (bytes[i] - b'0') as c_int;
        i += 1;
    }
    value
}

const MAJOR: c_int = parse_component(env!("CARGO_PKG_VERSION_MAJOR"));
const MINOR: c_int = parse_component(env!("CARGO_PKG_VERSION_MINOR"));
const PATCH: c_int = parse_component(env!("CARGO_PKG_VERSION_PATCH"));

/// Crate version packed as `major * 1_000_000 + minor * 1_000 + patch`.
pub const PACKED_VERSION: c_int = MAJOR * 1_000_000 + MINOR * 1_000 + PATCH;

const REVISION: &str = concat!("relaylib ", env!("CARGO_PKG_VERSION"), "\0");

pub(crate) unsafe extern "C" fn rl_get_version() -> c_int {
    PACKED_VERSION
}

pub(crate) unsafe extern "C" fn rl_get_revision() -> *const c_char {
    REVISION.as_ptr().cast()
}
