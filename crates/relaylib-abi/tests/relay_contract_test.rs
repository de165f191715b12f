//! Integration tests for entry-contract negotiation.

#![cfg(feature = "dynamic-api")]

use std::sync::Mutex;

use relaylib_abi::RELAY_API_VERSION;
use relaylib_abi::entry::{
    ENTRY_INCOMPATIBLE_VERSION, ENTRY_OK, ENTRY_TABLE_TOO_LARGE, rl_relay_entry,
};
use relaylib_abi::table::{SLOT_COUNT, table_size};

const WORD: usize = size_of::<usize>();

// Negotiation rewrites the process table in place, so the calls are
// serialized even though the assertions are independent.
static TEST_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn version_gate_rejects_other_versions() {
    let _guard = TEST_LOCK.lock().unwrap();
    let mut buf = vec![0u8; table_size()];
    let rc = unsafe {
        rl_relay_entry(
            RELAY_API_VERSION + 1,
            buf.as_mut_ptr().cast(),
            table_size() as u32,
        )
    };
    assert_eq!(rc, ENTRY_INCOMPATIBLE_VERSION);
    assert!(buf.iter().all(|&b| b == 0), "rejected caller must see no writes");
}

#[test]
fn size_gate_rejects_larger_tables() {
    let _guard = TEST_LOCK.lock().unwrap();
    let mut buf = vec![0u8; table_size() + WORD];
    let rc = unsafe {
        rl_relay_entry(
            RELAY_API_VERSION,
            buf.as_mut_ptr().cast(),
            (table_size() + 1) as u32,
        )
    };
    assert_eq!(rc, ENTRY_TABLE_TOO_LARGE);
    assert!(buf.iter().all(|&b| b == 0), "rejected caller must see no writes");
}

#[test]
fn successful_negotiation_fills_every_slot() {
    let _guard = TEST_LOCK.lock().unwrap();
    let mut slots = vec![0usize; SLOT_COUNT];
    let rc = unsafe {
        rl_relay_entry(
            RELAY_API_VERSION,
            slots.as_mut_ptr().cast(),
            table_size() as u32,
        )
    };
    assert_eq!(rc, ENTRY_OK);
    assert!(slots.iter().all(|&slot| slot != 0));
}

#[test]
fn smaller_declared_table_gets_a_truncated_copy() {
    const PATTERN: u8 = 0xA5;
    let _guard = TEST_LOCK.lock().unwrap();

    let total = table_size();
    let declared = total - WORD;
    let mut buf = vec![PATTERN; total];
    let rc = unsafe { rl_relay_entry(RELAY_API_VERSION, buf.as_mut_ptr().cast(), declared as u32) };
    assert_eq!(rc, ENTRY_OK);

    // Every declared word was rewritten with a pointer.
    assert!(
        buf[..declared]
            .chunks(WORD)
            .all(|word| word.iter().any(|&b| b != PATTERN))
    );
    // Bytes past the declared size belong to the caller, untouched.
    assert!(buf[declared..].iter().all(|&b| b == PATTERN));
}

#[test]
fn negotiation_is_repeatable() {
    let _guard = TEST_LOCK.lock().unwrap();
    let mut first = vec![0usize; SLOT_COUNT];
    let mut second = vec![0usize; SLOT_COUNT];
    unsafe {
        assert_eq!(
            rl_relay_entry(RELAY_API_VERSION, first.as_mut_ptr().cast(), table_size() as u32),
            ENTRY_OK
        );
        assert_eq!(
            rl_relay_entry(RELAY_API_VERSION, second.as_mut_ptr().cast(), table_size() as u32),
            ENTRY_OK
        );
    }
    assert_eq!(first, second);
}
