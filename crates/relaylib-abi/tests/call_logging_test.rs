//! Tracing overlay activation through the environment toggle.
//!
//! This file holds exactly one test so the process starts with the guard
//! untouched and nothing else races the environment setup.

#![cfg(feature = "call-logging")]

use relaylib_abi::init::{self, InitOrigin};
use relaylib_abi::stubs;

#[test]
fn trace_toggle_installs_the_overlay() {
    // SAFETY: no other thread exists yet in this test process.
    unsafe {
        std::env::remove_var(relaylib_abi::RELAY_OVERRIDE_ENV);
        std::env::set_var(relaylib_abi::RELAY_LOG_CALLS_ENV, "1");
    }

    // First use installs the overlay; raise the threshold right away so
    // the remaining traced calls stay quiet on stderr.
    unsafe { stubs::rl_log_set_priority(relaylib_abi::PRIORITY_ERROR) };

    assert!(init::overlay_active_for_tests());
    assert_eq!(init::init_origin_for_tests(), InitOrigin::Internal);
    assert_eq!(init::init_count_for_tests(), 1);

    // Overlay slots forward to the same implementations.
    assert_eq!(unsafe { stubs::rl_strlen(c"abc".as_ptr()) }, 3);
    assert_eq!(unsafe { stubs::rl_log_get_priority() }, relaylib_abi::PRIORITY_ERROR);
    unsafe { stubs::rl_log_set_priority(relaylib_abi::PRIORITY_INFO) };
}
