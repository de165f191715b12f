//! Two-tier materialization in the formatted-call adapters.
//!
//! Short messages must stay on the adapter's stack buffer; long ones take
//! exactly one table allocation and release it before returning. The heap
//! counters are process-wide, so every test serializes on one lock.

#![cfg(feature = "dynamic-api")]

use std::ffi::{CStr, CString, c_char};
use std::sync::Mutex;

use relaylib_abi::real::mem;
use relaylib_abi::varargs::{self, ADAPTER_STACK_BUF};
use relaylib_abi::{args, stubs};

static TEST_LOCK: Mutex<()> = Mutex::new(());

fn prime() {
    // SAFETY: serialized by TEST_LOCK with every other environment
    // toucher in this binary.
    unsafe { std::env::remove_var(relaylib_abi::RELAY_OVERRIDE_ENV) };
    assert!(unsafe { stubs::rl_get_version() } > 0);
}

fn counters() -> (usize, usize) {
    (
        mem::heap_alloc_count_for_tests(),
        mem::heap_release_count_for_tests(),
    )
}

fn set_error_text(text: &str) {
    let message = CString::new(text).unwrap();
    let pack = [args::arg_cstr(message.as_ptr())];
    let rc = unsafe { varargs::rl_set_error(c"%s".as_ptr(), pack.as_ptr(), pack.len()) };
    assert_eq!(rc, -1);
}

fn current_error() -> String {
    let p = unsafe { stubs::rl_get_error() };
    unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_owned()
}

#[test]
fn short_message_stays_on_the_stack_tier() {
    let _guard = TEST_LOCK.lock().unwrap();
    prime();

    let before = counters();
    let pack = [args::arg_i32(7)];
    let rc = unsafe { varargs::rl_set_error(c"slot %d failed".as_ptr(), pack.as_ptr(), 1) };
    assert_eq!(rc, -1);
    assert_eq!(counters(), before);
    assert_eq!(current_error(), "slot 7 failed");
}

#[test]
fn boundary_lengths_pick_the_right_tier() {
    let _guard = TEST_LOCK.lock().unwrap();
    prime();

    // Longest message that still fits the stack buffer with its NUL.
    let fits = "x".repeat(ADAPTER_STACK_BUF - 1);
    let before = counters();
    set_error_text(&fits);
    assert_eq!(counters(), before);
    assert_eq!(current_error(), fits);

    // One byte longer spills to the heap tier.
    let spills = "y".repeat(ADAPTER_STACK_BUF);
    let before = counters();
    set_error_text(&spills);
    assert_eq!(counters(), (before.0 + 1, before.1 + 1));
    assert_eq!(current_error(), spills);
}

#[test]
fn long_message_takes_one_allocation_and_releases_it() {
    let _guard = TEST_LOCK.lock().unwrap();
    prime();

    let long = "z".repeat(300);
    let before = counters();
    set_error_text(&long);
    let after = counters();
    assert_eq!(after.0, before.0 + 1);
    assert_eq!(after.1, before.1 + 1);
    assert_eq!(current_error(), long);
}

#[test]
fn suppressed_log_still_renders_without_heap_traffic() {
    let _guard = TEST_LOCK.lock().unwrap();
    prime();

    let saved = unsafe { stubs::rl_log_get_priority() };
    unsafe { stubs::rl_log_set_priority(relaylib_abi::PRIORITY_ERROR) };
    let before = counters();
    let pack = [args::arg_i32(12)];
    unsafe { varargs::rl_log_info(c"worker %d idle".as_ptr(), pack.as_ptr(), 1) };
    assert_eq!(counters(), before);
    unsafe { stubs::rl_log_set_priority(saved) };
}

#[test]
fn pass_through_faces_reach_the_renderer() {
    let _guard = TEST_LOCK.lock().unwrap();
    prime();

    let mut buf = [0u8; 24];
    let pack = [args::arg_cstr(c"relay".as_ptr()), args::arg_i32(4)];
    let n = unsafe {
        varargs::rl_snprintf(
            buf.as_mut_ptr().cast(),
            buf.len(),
            c"%s/%d".as_ptr(),
            pack.as_ptr(),
            pack.len(),
        )
    };
    assert_eq!(n, 7);
    assert_eq!(&buf[..8], b"relay/4\0");

    let mut parsed: i32 = 0;
    let scan_pack = [args::arg_ptr(&raw mut parsed)];
    let matched = unsafe {
        varargs::rl_sscanf(
            c"count 39".as_ptr(),
            c"count %d".as_ptr(),
            scan_pack.as_ptr(),
            scan_pack.len(),
        )
    };
    assert_eq!(matched, 1);
    assert_eq!(parsed, 39);
}

#[test]
fn asprintf_hands_the_caller_a_table_allocation() {
    let _guard = TEST_LOCK.lock().unwrap();
    prime();

    let mut out: *mut c_char = std::ptr::null_mut();
    let pack = [args::arg_u32(0xbeef)];
    let before = counters();
    let n = unsafe {
        varargs::rl_asprintf(&raw mut out, c"tag=%#x".as_ptr(), pack.as_ptr(), pack.len())
    };
    assert_eq!(n, 10);
    assert!(!out.is_null());
    assert_eq!(mem::heap_alloc_count_for_tests(), before.0 + 1);
    assert_eq!(unsafe { CStr::from_ptr(out) }.to_bytes(), b"tag=0xbeef");

    unsafe { stubs::rl_free(out.cast()) };
    assert_eq!(mem::heap_release_count_for_tests(), before.1 + 1);
}
