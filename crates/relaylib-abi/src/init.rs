//! One-time initialization.
//!
//! A three-state guard fuses the lock and the done flag: UNINIT ->
//! INITIALIZING -> READY. Exactly one thread wins the transition out of
//! UNINIT and runs the bootstrap; every other first-caller waits for READY
//! and then proceeds through the now-populated table. The bootstrap itself
//! must not call any public face, only raw writes and direct populate
//! passes, since a face would land back on a bootstrap stub and wait on
//! this same guard.

use std::hint;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

#[cfg(feature = "call-logging")]
use std::sync::atomic::AtomicBool;

use crate::{diag, loader, table};

const STATE_UNINIT: u8 = 0;
const STATE_INITIALIZING: u8 = 1;
const STATE_READY: u8 = 2;

const ORIGIN_PENDING: u8 = 0;
const ORIGIN_INTERNAL: u8 = 1;
const ORIGIN_OVERRIDE: u8 = 2;

static INIT_STATE: AtomicU8 = AtomicU8::new(STATE_UNINIT);
static INIT_RUNS: AtomicUsize = AtomicUsize::new(0);
static INIT_ORIGIN: AtomicU8 = AtomicU8::new(ORIGIN_PENDING);
#[cfg(feature = "call-logging")]
static OVERLAY_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Where the table contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOrigin {
    /// First-use initialization has not completed.
    Pending,
    /// The in-crate implementations.
    Internal,
    /// A negotiated override module.
    Override,
}

/// First-use gate called by every bootstrap face.
pub(crate) fn ensure_initialized() {
    match INIT_STATE.compare_exchange(
        STATE_UNINIT,
        STATE_INITIALIZING,
        Ordering::SeqCst,
        Ordering::Relaxed,
    ) {
        Ok(_) => {
            run_bootstrap();
            INIT_STATE.store(STATE_READY, Ordering::Release);
        }
        Err(_) => {
            // Table population must be visible before we let the caller
            // proceed through its slot.
            while INIT_STATE.load(Ordering::Acquire) != STATE_READY {
                hint::spin_loop();
            }
        }
    }
}

/// Scan override candidates, then fall back to the in-crate populate pass.
/// Runs on exactly one thread per process.
fn run_bootstrap() {
    INIT_RUNS.fetch_add(1, Ordering::Relaxed);

    let size = table::table_size() as u32;
    let own = table::table_mut_ptr().cast::<std::ffi::c_void>();

    if let Some(list) = loader::read_override_list() {
        for name in loader::candidates(&list) {
            let Some(entry) = loader::load_candidate(&name) else {
                diag::warn_candidate_unloadable(&name);
                continue;
            };
            // SAFETY: the entry contract takes our own table buffer and
            // its true size.
            let code = unsafe { entry(crate::RELAY_API_VERSION, own, size) };
            if code == crate::entry::ENTRY_OK {
                INIT_ORIGIN.store(ORIGIN_OVERRIDE, Ordering::Relaxed);
                return;
            }
            diag::warn_candidate_rejected(&name, code);
        }
    }

    if crate::entry::initialize_table(crate::RELAY_API_VERSION, own, size) != crate::entry::ENTRY_OK
    {
        diag::fatal("internal table initialization failed");
    }
    INIT_ORIGIN.store(ORIGIN_INTERNAL, Ordering::Relaxed);
}

#[cfg(feature = "call-logging")]
pub(crate) fn note_overlay_active() {
    OVERLAY_ACTIVE.store(true, Ordering::Relaxed);
}

/// True when initialization installed the tracing overlay.
#[cfg(feature = "call-logging")]
pub fn overlay_active_for_tests() -> bool {
    OVERLAY_ACTIVE.load(Ordering::Relaxed)
}

/// Times the bootstrap has run in this process. The whole point of the
/// guard is that this never passes 1.
pub fn init_count_for_tests() -> usize {
    INIT_RUNS.load(Ordering::Relaxed)
}

/// What populated the table, or Pending before first use.
pub fn init_origin_for_tests() -> InitOrigin {
    match INIT_ORIGIN.load(Ordering::Relaxed) {
        ORIGIN_INTERNAL => InitOrigin::Internal,
        ORIGIN_OVERRIDE => InitOrigin::Override,
        _ => InitOrigin::Pending,
    }
}

/// True once the guard has published READY.
pub fn init_ready_for_tests() -> bool {
    INIT_STATE.load(Ordering::Acquire) == STATE_READY
}
