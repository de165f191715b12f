//! Call-tracing overlay.
//!
//! When the trace environment variable is set at first use, initialization
//! populates the table with these wrappers instead of the implementations.
//! Each one logs the slot name and forwards, so every relayed call shows
//! up in the log stream at INFO.

use std::ffi::{c_char, c_int, c_long, c_void};

use crate::macros::define_overlay_fns;
use crate::procs::for_each_api_proc;

for_each_api_proc!(define_overlay_fns);
