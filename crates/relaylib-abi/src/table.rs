//! The process-wide jump table.
//!
//! One mutable singleton, const-initialized so that every slot points at
//! its bootstrap face. Initialization (or an external entry call) rewrites
//! the slots in place; public stubs keep reading through [`table_ref`] for
//! the life of the process.

use std::cell::UnsafeCell;
use std::ffi::{c_char, c_int, c_long, c_void};

use crate::macros::{define_initial_table, define_jump_table, define_populate_fns};
use crate::procs::for_each_api_proc;
use crate::stubs::*;
use crate::varargs::*;

for_each_api_proc!(define_jump_table);
for_each_api_proc!(define_initial_table);
for_each_api_proc!(define_populate_fns);

struct TableCell(UnsafeCell<JumpTable>);

// SAFETY: the only writers are the section guarded by `init` and an entry
// negotiation performed before first use. Readers observe each slot as
// either its bootstrap face or a populated pointer, and both are sound to
// call through the slot's signature.
unsafe impl Sync for TableCell {}

static TABLE: TableCell = TableCell(UnsafeCell::new(initial_table()));

/// Shared view of the live table. Slots read through this before first-use
/// initialization still hold bootstrap faces, which is fine: calling one
/// triggers initialization and forwards.
pub fn table_ref() -> &'static JumpTable {
    // SAFETY: see TableCell.
    unsafe { &*TABLE.0.get() }
}

/// Raw table pointer for populate passes and entry negotiation.
pub(crate) fn table_mut_ptr() -> *mut JumpTable {
    TABLE.0.get()
}

/// Byte size of the table layout this build was compiled against.
pub fn table_size() -> usize {
    size_of::<JumpTable>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_count_matches_roster() {
        assert_eq!(SLOT_COUNT, 39);
    }

    #[test]
    fn table_layout_is_dense_pointer_words() {
        assert_eq!(table_size(), SLOT_COUNT * size_of::<usize>());
    }
}
