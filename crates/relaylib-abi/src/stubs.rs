//! Generated faces for every fixed-arity slot.
//!
//! Each `proc` roster entry expands to a `_bootstrap` face (runs first-use
//! initialization, then forwards through the table) and the exported public
//! face (forwards unconditionally). The public faces carry no guard at all:
//! whatever sits in the slot at call time is what runs, which is what lets
//! an entry negotiation performed before first use bypass initialization
//! entirely.

use std::ffi::{c_char, c_int, c_long, c_void};

use crate::macros::define_api_stubs;
use crate::procs::for_each_api_proc;

for_each_api_proc!(define_api_stubs);
