//! Callback macros expanded over the roster in `procs.rs`.
//!
//! Each macro here is one pass over the slot list: the table struct, the
//! stub faces, the populate passes and the tracing overlay. They are only
//! ever invoked as `for_each_api_proc!(callback_name)` from the module that
//! owns the generated items.

/// Generate the `#[repr(C)]` jump table struct plus its slot count.
///
/// # Usage
///
/// ```ignore
/// for_each_api_proc!(define_jump_table);
/// ```
///
/// Field order follows roster order, which is what gives the struct a
/// stable negotiated layout.
macro_rules! define_jump_table {
    ($($kind:ident fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;)*) => {
        /// Process-wide dispatch table: one function pointer per public
        /// relay symbol, in roster order.
        #[repr(C)]
        pub struct JumpTable {
            $(pub $name: unsafe extern "C" fn($($ty),*) $(-> $ret)?,)*
        }

        /// Number of function-pointer slots in [`JumpTable`].
        pub const SLOT_COUNT: usize = [$(stringify!($name)),*].len();
    };
}
pub(crate) use define_jump_table;

/// Generate the table value in force before any initialization: every slot
/// bound to its `_bootstrap` face. Expansion site must have all bootstrap
/// fns in scope.
macro_rules! define_initial_table {
    ($($kind:ident fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;)*) => {
        pub(crate) const fn initial_table() -> JumpTable {
            paste::paste! {
                JumpTable {
                    $($name: [<$name _bootstrap>],)*
                }
            }
        }
    };
}
pub(crate) use define_initial_table;

/// Generate both faces of every fixed-arity slot: the `_bootstrap` face
/// that runs first-use initialization before forwarding, and the exported
/// public face that forwards unconditionally. `vararg` roster entries are
/// skipped; their faces are written out in `varargs.rs`.
///
/// Without the `dynamic-api` feature the public face binds straight to the
/// implementation and no bootstrap face exists.
macro_rules! define_api_stubs {
    ($($kind:ident fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;)*) => {
        $(define_api_stubs!(@each $kind fn $name($($arg: $ty),*) $(-> $ret)?);)*
    };
    (@each proc fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?) => {
        paste::paste! {
            #[cfg(feature = "dynamic-api")]
            pub(crate) unsafe extern "C" fn [<$name _bootstrap>]($($arg: $ty),*) $(-> $ret)? {
                crate::init::ensure_initialized();
                // SAFETY: after initialization the slot holds a pointer with
                // this exact signature; the caller's obligations pass through.
                unsafe { (crate::table::table_ref().$name)($($arg),*) }
            }
        }

        #[cfg(feature = "dynamic-api")]
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $name($($arg: $ty),*) $(-> $ret)? {
            // SAFETY: slots only ever hold the bootstrap face or a
            // negotiated pointer of this signature.
            unsafe { (crate::table::table_ref().$name)($($arg),*) }
        }

        #[cfg(not(feature = "dynamic-api"))]
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $name($($arg: $ty),*) $(-> $ret)? {
            // SAFETY: caller obligations pass through to the implementation.
            unsafe { crate::real::$name($($arg),*) }
        }
    };
    (@each vararg fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?) => {};
}
pub(crate) use define_api_stubs;

/// Generate the populate passes: `populate_real` rebinds every slot to the
/// in-crate implementation, `populate_overlay` rebinds every slot to its
/// tracing wrapper.
macro_rules! define_populate_fns {
    ($($kind:ident fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;)*) => {
        pub(crate) fn populate_real(table: &mut JumpTable) {
            $(table.$name = crate::real::$name;)*
        }

        #[cfg(feature = "call-logging")]
        pub(crate) fn populate_overlay(table: &mut JumpTable) {
            $(table.$name = crate::overlay::$name;)*
        }
    };
}
pub(crate) use define_populate_fns;

/// Generate the tracing overlay: one wrapper per slot that logs the call
/// name and forwards to the in-crate implementation. The fixed-pack calling
/// convention lets formatted-call slots take the same shape as everything
/// else.
macro_rules! define_overlay_fns {
    ($($kind:ident fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;)*) => {
        $(
            pub(crate) unsafe extern "C" fn $name($($arg: $ty),*) $(-> $ret)? {
                crate::real::log::trace(stringify!($name));
                // SAFETY: same signature as the slot; caller obligations
                // pass through.
                unsafe { crate::real::$name($($arg),*) }
            }
        )*
    };
}
pub(crate) use define_overlay_fns;
