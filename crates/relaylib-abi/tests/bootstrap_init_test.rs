//! First-use initialization from concurrent callers.
//!
//! This file holds exactly one test so the process starts with the guard
//! untouched and nothing else races the environment setup.

#![cfg(feature = "dynamic-api")]

use std::sync::Barrier;
use std::thread;

use relaylib_abi::init::{self, InitOrigin};
use relaylib_abi::stubs;

#[test]
fn first_use_initializes_exactly_once() {
    // SAFETY: no other thread exists yet in this test process.
    unsafe { std::env::remove_var(relaylib_abi::RELAY_OVERRIDE_ENV) };

    const THREADS: usize = 16;
    let barrier = Barrier::new(THREADS);
    thread::scope(|scope| {
        for i in 0..THREADS {
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                // Spread the first calls across unrelated families so
                // every thread enters through its own slot.
                match i % 4 {
                    0 => assert!(unsafe { stubs::rl_get_version() } > 0),
                    1 => assert_eq!(unsafe { stubs::rl_strlen(c"four".as_ptr()) }, 4),
                    2 => assert_eq!(unsafe { stubs::rl_atoi(c"-12".as_ptr()) }, -12),
                    _ => {
                        let a = [1u8, 2, 3];
                        let b = [1u8, 2, 3];
                        let rc = unsafe {
                            stubs::rl_memcmp(a.as_ptr().cast(), b.as_ptr().cast(), 3)
                        };
                        assert_eq!(rc, 0);
                    }
                }
                assert!(init::init_ready_for_tests());
            });
        }
    });

    assert_eq!(init::init_count_for_tests(), 1);
    assert_eq!(init::init_origin_for_tests(), InitOrigin::Internal);

    // Later calls dispatch straight through without re-initializing.
    assert_eq!(unsafe { stubs::rl_strlen(c"relay".as_ptr()) }, 5);
    assert_eq!(init::init_count_for_tests(), 1);
}
