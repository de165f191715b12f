//! Override scanning: every candidate fails and the internal table wins.
//!
//! This file holds exactly one test so the process starts with the guard
//! untouched and nothing else races the environment setup.

#![cfg(feature = "dynamic-api")]

use std::ffi::CStr;

use relaylib_abi::diag;
use relaylib_abi::init::{self, InitOrigin};
use relaylib_abi::{args, stubs, varargs};

#[test]
fn unresolvable_candidates_fall_back_to_internal() {
    // SAFETY: no other thread exists yet in this test process.
    unsafe {
        std::env::set_var(
            relaylib_abi::RELAY_OVERRIDE_ENV,
            "/missing/one.so,,/missing/two.so",
        );
    }

    // First use runs the scan; both candidates fail to load.
    assert_eq!(unsafe { stubs::rl_strlen(c"abcde".as_ptr()) }, 5);

    assert_eq!(init::init_origin_for_tests(), InitOrigin::Internal);
    assert_eq!(init::init_count_for_tests(), 1);

    // One diagnostic per real candidate; the empty piece is not one.
    assert_eq!(diag::warn_count_for_tests(), 2);
    let warning = diag::last_warn_for_tests().unwrap();
    assert!(warning.contains("/missing/two.so"), "warning was: {warning}");

    // The fallback table serves the whole surface.
    let pack = [args::arg_i32(3)];
    let rc = unsafe { varargs::rl_set_error(c"attempt %d".as_ptr(), pack.as_ptr(), pack.len()) };
    assert_eq!(rc, -1);
    let text = unsafe { CStr::from_ptr(stubs::rl_get_error()) };
    assert_eq!(text.to_bytes(), b"attempt 3");
}
