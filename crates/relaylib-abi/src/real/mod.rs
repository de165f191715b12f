//! In-crate implementations behind every slot.
//!
//! These are what the table binds to when no override module wins
//! negotiation. Each function carries the exact slot signature so the
//! populate pass can assign them wholesale. Submodules group by concern;
//! the flat re-exports below give the generated passes one path per slot.

pub(crate) mod convert;
pub(crate) mod env;
pub(crate) mod error;
pub(crate) mod log;
pub mod mem;
pub(crate) mod stdio;
pub mod version;

pub(crate) use convert::{rl_atoi, rl_strtol};
pub(crate) use env::{rl_getenv, rl_setenv, rl_unsetenv};
pub(crate) use error::{rl_clear_error, rl_get_error, rl_out_of_memory, rl_set_error};
pub(crate) use log::{
    rl_log, rl_log_debug, rl_log_error, rl_log_get_priority, rl_log_info, rl_log_message,
    rl_log_message_v, rl_log_set_priority, rl_log_warn,
};
pub(crate) use mem::{
    rl_calloc, rl_free, rl_malloc, rl_memcmp, rl_memcpy, rl_memmove, rl_memset, rl_realloc,
    rl_strlcat, rl_strlcpy, rl_strlen,
};
pub(crate) use stdio::{
    rl_asprintf, rl_fdprintf, rl_snprintf, rl_sscanf, rl_vasprintf, rl_vfdprintf, rl_vsnprintf,
    rl_vsscanf,
};
pub(crate) use version::{rl_get_revision, rl_get_version};
