//! Formatted output and input slots.
//!
//! The heart of these is [`render_pack`]: it walks the parsed format,
//! draws one `u64` word per conversion from the pack and narrows it
//! according to the directive, then hands the typed value to the pure
//! renderers in `relaylib_core::fmt`. The scan side mirrors it with the
//! pure engine in `relaylib_core::scan` plus typed stores through the
//! pack's output pointers.

use std::ffi::{CStr, c_char, c_int, c_long};
use std::ptr;
use std::slice;

use relaylib_core::fmt::{self, Directive, LengthMod, Precision, Segment, Width};
use relaylib_core::scan::{self, Conversion, ScanValue};

use crate::args::MAX_PACK_ARGS;

/// Render a pack to bytes, without a trailing NUL.
///
/// `None` means the call was malformed: null format, null pack with a
/// nonzero count, or a format that consumes more words than the pack
/// carries.
///
/// # Safety
///
/// `fmt_ptr` must be NUL-terminated, `args` must span `nargs` words, and
/// every `%s` word must hold a NUL-terminated string address or null.
pub(crate) unsafe fn render_pack(
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> Option<Vec<u8>> {
    if fmt_ptr.is_null() {
        return None;
    }
    // SAFETY: NUL-terminated per this function's contract.
    let fmt_bytes = unsafe { CStr::from_ptr(fmt_ptr) }.to_bytes();
    let nargs = nargs.min(MAX_PACK_ARGS);
    let words: &[u64] = if nargs == 0 {
        &[]
    } else {
        if args.is_null() {
            return None;
        }
        // SAFETY: spans nargs words per this function's contract.
        unsafe { slice::from_raw_parts(args, nargs) }
    };

    let mut out = Vec::with_capacity(fmt_bytes.len() + 16);
    let mut next = 0usize;
    for segment in fmt::parse_format(fmt_bytes) {
        match segment {
            Segment::Literal(bytes) => out.extend_from_slice(bytes),
            Segment::Percent => out.push(b'%'),
            Segment::Directive(mut dir) => {
                if dir.width == Width::FromArg {
                    let w = take_word(words, &mut next)? as i64 as i32;
                    // Negative star width reads as '-' flag plus magnitude.
                    if w < 0 {
                        dir.flags.left_justify = true;
                        dir.width = Width::Fixed(w.unsigned_abs() as usize);
                    } else {
                        dir.width = Width::Fixed(w as usize);
                    }
                }
                if dir.precision == Precision::FromArg {
                    let p = take_word(words, &mut next)? as i64 as i32;
                    // Negative star precision reads as no precision at all.
                    dir.precision = if p < 0 {
                        Precision::None
                    } else {
                        Precision::Fixed(p as usize)
                    };
                }
                let word = take_word(words, &mut next)?;
                // SAFETY: %s words obey the pack contract.
                unsafe { render_one(&dir, word, &mut out)? };
            }
        }
    }
    Some(out)
}

fn take_word(words: &[u64], next: &mut usize) -> Option<u64> {
    let word = words.get(*next).copied()?;
    *next += 1;
    Some(word)
}

/// # Safety
///
/// For `%s`, `word` must hold a NUL-terminated string address or null.
unsafe fn render_one(dir: &Directive, word: u64, out: &mut Vec<u8>) -> Option<()> {
    match dir.conversion {
        b'd' | b'i' => fmt::format_signed(signed_from_word(word, dir.length), dir, out),
        b'u' | b'o' | b'x' | b'X' => {
            fmt::format_unsigned(unsigned_from_word(word, dir.length), dir, out)
        }
        b'f' | b'F' | b'e' | b'E' | b'g' | b'G' => {
            fmt::format_float(f64::from_bits(word), dir, out)
        }
        b'c' => fmt::format_char(word as u8, dir, out),
        b's' => {
            let p = word as usize as *const c_char;
            if p.is_null() {
                fmt::format_str(b"(null)", dir, out);
            } else {
                // SAFETY: non-null %s word per this function's contract.
                let s = unsafe { CStr::from_ptr(p) }.to_bytes();
                fmt::format_str(s, dir, out);
            }
        }
        b'p' => fmt::format_pointer(word as usize, dir, out),
        _ => return None,
    }
    Some(())
}

/// Narrow a pack word for `%d`/`%i` under the directive's length modifier.
/// Words are stored sign-extended, so narrowing then widening restores the
/// value the caller packed.
fn signed_from_word(word: u64, length: LengthMod) -> i64 {
    let wide = word as i64;
    match length {
        LengthMod::Hh => i64::from(wide as i8),
        LengthMod::H => i64::from(wide as i16),
        LengthMod::None => i64::from(wide as i32),
        LengthMod::L | LengthMod::Ll => wide,
        LengthMod::Z => wide as isize as i64,
    }
}

fn unsigned_from_word(word: u64, length: LengthMod) -> u64 {
    match length {
        LengthMod::Hh => u64::from(word as u8),
        LengthMod::H => u64::from(word as u16),
        LengthMod::None => u64::from(word as u32),
        LengthMod::L | LengthMod::Ll => word,
        LengthMod::Z => word as usize as u64,
    }
}

fn clamp_len(len: usize) -> c_int {
    c_int::try_from(len).unwrap_or(c_int::MAX)
}

// ---------------------------------------------------------------------------
// Output slots
// ---------------------------------------------------------------------------

pub(crate) unsafe extern "C" fn rl_vsnprintf(
    buf: *mut c_char,
    maxlen: usize,
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: pack contract passes through from the slot caller.
    let Some(rendered) = (unsafe { render_pack(fmt_ptr, args, nargs) }) else {
        return -1;
    };
    let needed = clamp_len(rendered.len());
    if maxlen == 0 {
        return needed;
    }
    if buf.is_null() {
        return -1;
    }
    let copy = rendered.len().min(maxlen - 1);
    // SAFETY: buf spans maxlen bytes per contract.
    unsafe {
        ptr::copy_nonoverlapping(rendered.as_ptr(), buf.cast::<u8>(), copy);
        *buf.add(copy) = 0;
    }
    needed
}

pub(crate) unsafe extern "C" fn rl_vasprintf(
    strp: *mut *mut c_char,
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    if strp.is_null() {
        return -1;
    }
    // SAFETY: pack contract passes through from the slot caller.
    let Some(rendered) = (unsafe { render_pack(fmt_ptr, args, nargs) }) else {
        return -1;
    };
    // The result belongs to the table allocator so callers release it
    // through rl_free.
    // SAFETY: fresh allocation of rendered.len() + 1 bytes; copy stays in
    // bounds; strp points at writable pointer storage per contract.
    unsafe {
        let mem = super::mem::rl_malloc(rendered.len() + 1).cast::<u8>();
        if mem.is_null() {
            return -1;
        }
        ptr::copy_nonoverlapping(rendered.as_ptr(), mem, rendered.len());
        *mem.add(rendered.len()) = 0;
        *strp = mem.cast::<c_char>();
    }
    clamp_len(rendered.len())
}

pub(crate) unsafe extern "C" fn rl_vfdprintf(
    fd: c_int,
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: pack contract passes through from the slot caller.
    let Some(rendered) = (unsafe { render_pack(fmt_ptr, args, nargs) }) else {
        return -1;
    };
    // SAFETY: valid buffer and length for the write syscall.
    let wrote = unsafe { libc::write(fd, rendered.as_ptr().cast(), rendered.len()) };
    if wrote < 0 {
        return -1;
    }
    clamp_len(wrote as usize)
}

// ---------------------------------------------------------------------------
// Input slot
// ---------------------------------------------------------------------------

pub(crate) unsafe extern "C" fn rl_vsscanf(
    input: *const c_char,
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    if input.is_null() || fmt_ptr.is_null() {
        return -1;
    }
    // SAFETY: NUL-terminated strings per contract.
    let input_bytes = unsafe { CStr::from_ptr(input) }.to_bytes();
    let fmt_bytes = unsafe { CStr::from_ptr(fmt_ptr) }.to_bytes();
    let outcome = scan::scan(input_bytes, fmt_bytes);

    let nargs = nargs.min(MAX_PACK_ARGS);
    let words: &[u64] = if nargs == 0 || args.is_null() {
        &[]
    } else {
        // SAFETY: spans nargs words per contract.
        unsafe { slice::from_raw_parts(args, nargs) }
    };

    let mut stored = 0usize;
    for conversion in &outcome.conversions {
        let Some(&word) = words.get(stored) else {
            break;
        };
        if word == 0 {
            break;
        }
        // SAFETY: each pack word is a destination pointer sized for the
        // conversion per contract; %s destinations have room for the run
        // plus a NUL.
        unsafe { store_conversion(conversion, word as usize) };
        stored += 1;
    }
    if stored == 0 && outcome.input_failure {
        return -1;
    }
    clamp_len(stored)
}

unsafe fn store_conversion(conversion: &Conversion<'_>, dest: usize) {
    // SAFETY: dest is a valid, correctly typed destination per the caller.
    unsafe {
        match conversion.value {
            ScanValue::Signed(v) => match conversion.length {
                LengthMod::Hh => *(dest as *mut i8) = v as i8,
                LengthMod::H => *(dest as *mut i16) = v as i16,
                LengthMod::None => *(dest as *mut c_int) = v as c_int,
                LengthMod::L => *(dest as *mut c_long) = v as c_long,
                LengthMod::Ll => *(dest as *mut i64) = v,
                LengthMod::Z => *(dest as *mut isize) = v as isize,
            },
            ScanValue::Unsigned(v) => match conversion.length {
                LengthMod::Hh => *(dest as *mut u8) = v as u8,
                LengthMod::H => *(dest as *mut u16) = v as u16,
                LengthMod::None => *(dest as *mut u32) = v as u32,
                LengthMod::L => *(dest as *mut libc::c_ulong) = v as libc::c_ulong,
                LengthMod::Ll => *(dest as *mut u64) = v,
                LengthMod::Z => *(dest as *mut usize) = v as usize,
            },
            ScanValue::Float(v) => match conversion.length {
                LengthMod::L | LengthMod::Ll => *(dest as *mut f64) = v,
                _ => *(dest as *mut f32) = v as f32,
            },
            ScanValue::Bytes(bytes) => {
                let p = dest as *mut u8;
                ptr::copy_nonoverlapping(bytes.as_ptr(), p, bytes.len());
                if conversion.conversion == b's' {
                    *p.add(bytes.len()) = 0;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Formatted faces (fixed by the adapters, identical here)
// ---------------------------------------------------------------------------

pub(crate) unsafe extern "C" fn rl_sscanf(
    input: *const c_char,
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: same contract as the primitive.
    unsafe { rl_vsscanf(input, fmt_ptr, args, nargs) }
}

pub(crate) unsafe extern "C" fn rl_snprintf(
    buf: *mut c_char,
    maxlen: usize,
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: same contract as the primitive.
    unsafe { rl_vsnprintf(buf, maxlen, fmt_ptr, args, nargs) }
}

pub(crate) unsafe extern "C" fn rl_asprintf(
    strp: *mut *mut c_char,
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: same contract as the primitive.
    unsafe { rl_vasprintf(strp, fmt_ptr, args, nargs) }
}

pub(crate) unsafe extern "C" fn rl_fdprintf(
    fd: c_int,
    fmt_ptr: *const c_char,
    args: *const u64,
    nargs: usize,
) -> c_int {
    // SAFETY: same contract as the primitive.
    unsafe { rl_vfdprintf(fd, fmt_ptr, args, nargs) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{arg_cstr, arg_f64, arg_i32, arg_ptr, arg_u32, arg_usize};

    fn snprintf(buf: &mut [u8], fmt: &CStr, pack: &[u64]) -> c_int {
        unsafe {
            rl_vsnprintf(
                buf.as_mut_ptr().cast(),
                buf.len(),
                fmt.as_ptr(),
                pack.as_ptr(),
                pack.len(),
            )
        }
    }

    fn cstr_in(buf: &[u8]) -> &str {
        let end = buf.iter().position(|&b| b == 0).unwrap();
        std::str::from_utf8(&buf[..end]).unwrap()
    }

    #[test]
    fn renders_mixed_directives() {
        let mut buf = [0u8; 64];
        let s = c"x";
        let pack = [arg_i32(-42), arg_u32(0xbeef), arg_cstr(s.as_ptr()), arg_f64(2.5)];
        let n = snprintf(&mut buf, c"<%05d|%#x|%s|%.1f>", &pack);
        assert_eq!(n, 20);
        assert_eq!(cstr_in(&buf), "<-0042|0xbeef|x|2.5>");
    }

    #[test]
    fn reports_needed_length_when_truncating() {
        let mut buf = [0u8; 8];
        let n = snprintf(&mut buf, c"%s", &[arg_cstr(c"0123456789".as_ptr())]);
        assert_eq!(n, 10);
        assert_eq!(cstr_in(&buf), "0123456");
    }

    #[test]
    fn zero_capacity_only_counts() {
        let n = unsafe {
            rl_vsnprintf(
                ptr::null_mut(),
                0,
                c"%d%d".as_ptr(),
                [arg_i32(12), arg_i32(34)].as_ptr(),
                2,
            )
        };
        assert_eq!(n, 4);
    }

    #[test]
    fn star_width_comes_from_the_pack() {
        let mut buf = [0u8; 32];
        let n = snprintf(&mut buf, c"[%*d]", &[arg_i32(6), arg_i32(7)]);
        assert_eq!(n, 8);
        assert_eq!(cstr_in(&buf), "[     7]");

        let n = snprintf(&mut buf, c"[%*d]", &[arg_i32(-6), arg_i32(7)]);
        assert_eq!(n, 8);
        assert_eq!(cstr_in(&buf), "[7     ]");
    }

    #[test]
    fn null_string_word_renders_placeholder() {
        let mut buf = [0u8; 16];
        let n = snprintf(&mut buf, c"%s", &[0u64]);
        assert_eq!(n, 6);
        assert_eq!(cstr_in(&buf), "(null)");
    }

    #[test]
    fn short_pack_is_an_error() {
        let mut buf = [0u8; 16];
        let n = snprintf(&mut buf, c"%d %d", &[arg_i32(1)]);
        assert_eq!(n, -1);
    }

    #[test]
    fn length_modifiers_narrow_pack_words() {
        let mut buf = [0u8; 32];
        let n = snprintf(&mut buf, c"%hhd %hu %zu", &[
            arg_i32(-130),
            arg_u32(0x1_0007),
            arg_usize(9),
        ]);
        assert_eq!(n, 7);
        assert_eq!(cstr_in(&buf), "126 7 9");
    }

    #[test]
    fn asprintf_allocates_exactly_once() {
        use crate::real::mem;

        let before = mem::heap_alloc_count_for_tests();
        let mut out: *mut c_char = ptr::null_mut();
        let n = unsafe {
            rl_vasprintf(&mut out, c"%s=%d".as_ptr(), [
                arg_cstr(c"answer".as_ptr()),
                arg_i32(41),
            ]
            .as_ptr(), 2)
        };
        assert_eq!(n, 9);
        assert_eq!(mem::heap_alloc_count_for_tests(), before + 1);
        let text = unsafe { CStr::from_ptr(out) };
        assert_eq!(text.to_bytes(), b"answer=41");
        unsafe { mem::rl_free(out.cast()) };
    }

    #[test]
    fn sscanf_stores_through_pack_pointers() {
        let mut a: c_int = 0;
        let mut b: f64 = 0.0;
        let mut name = [0u8; 16];
        let pack = [
            arg_ptr(&raw mut a),
            arg_ptr(&raw mut b),
            arg_ptr(name.as_mut_ptr()),
        ];
        let n = unsafe {
            rl_vsscanf(
                c"17 -2.5e1 relay".as_ptr(),
                c"%d %lf %15s".as_ptr(),
                pack.as_ptr(),
                pack.len(),
            )
        };
        assert_eq!(n, 3);
        assert_eq!(a, 17);
        assert_eq!(b, -25.0);
        assert_eq!(cstr_in(&name), "relay");
    }

    #[test]
    fn sscanf_empty_input_is_eof() {
        let mut a: c_int = 0;
        let pack = [arg_ptr(&raw mut a)];
        let n = unsafe { rl_vsscanf(c"".as_ptr(), c"%d".as_ptr(), pack.as_ptr(), 1) };
        assert_eq!(n, -1);
    }

    #[test]
    fn sscanf_partial_match_counts_stores() {
        let mut a: c_int = 0;
        let mut b: c_int = 0;
        let pack = [arg_ptr(&raw mut a), arg_ptr(&raw mut b)];
        let n = unsafe { rl_vsscanf(c"5 x".as_ptr(), c"%d %d".as_ptr(), pack.as_ptr(), 2) };
        assert_eq!(n, 1);
        assert_eq!(a, 5);
    }
}
