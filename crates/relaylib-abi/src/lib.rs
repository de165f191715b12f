// Every exported face takes raw pointers from C callers under the usual
// C string/buffer contracts; per-function safety docs would restate the
// same contract for every slot.
#![allow(clippy::missing_safety_doc)]
//! # relaylib-abi
//!
//! Extern "C" boundary for relaylib: a versioned jump table of function
//! pointers that every public symbol dispatches through, plus the entry
//! contract that lets an external module take the table over at run time.
//!
//! # Architecture
//!
//! ```text
//! caller -> public stub -> jump table slot -> in-crate impl (or override)
//!                              ^
//!    first use: bootstrap stub -> init -> env scan -> entry negotiation
//! ```
//!
//! The first call to any public symbol lands on a bootstrap stub and runs
//! one-time initialization: the override environment variable is read,
//! candidate modules are loaded and negotiated through [`entry`], and when
//! no candidate wins the table binds to the in-crate implementations in
//! [`real`]. Every call after that is one slot load and an indirect jump.
//!
//! Formatted-call symbols use a counted argument pack (`*const u64` plus a
//! length) instead of C varargs, so adapters can forward packs across the
//! table without re-entering platform va_list territory. [`args`] has the
//! builders callers use to assemble packs.

mod macros;
mod procs;

pub mod args;
pub mod diag;
pub mod entry;
#[cfg(feature = "dynamic-api")]
pub mod init;
#[cfg(feature = "dynamic-api")]
mod loader;
#[cfg(feature = "call-logging")]
mod overlay;
pub mod real;
pub mod stubs;
#[cfg(feature = "dynamic-api")]
pub mod table;
pub mod varargs;

pub use relaylib_core::log::{PRIORITY_DEBUG, PRIORITY_ERROR, PRIORITY_INFO, PRIORITY_WARN};

/// Entry-contract version this build speaks. Bumped whenever the table
/// layout or negotiation rules change incompatibly.
pub const RELAY_API_VERSION: u32 = 2;

/// Environment variable holding a comma-separated list of override module
/// candidates, scanned in order at first use.
pub const RELAY_OVERRIDE_ENV: &str = "RELAYLIB_DYNAMIC_API";

/// Environment variable that swaps the call-tracing overlay in during
/// initialization when set to a nonzero integer.
pub const RELAY_LOG_CALLS_ENV: &str = "RELAYLIB_LOG_CALLS";

/// Symbol resolved in candidate override modules.
pub const RELAY_ENTRY_SYMBOL: &str = "rl_relay_entry";

/// Process exit code when the internal table cannot be populated. There is
/// no caller to report to at that point; every public symbol depends on the
/// table being usable.
pub const RELAY_FATAL_EXIT_CODE: i32 = 86;
