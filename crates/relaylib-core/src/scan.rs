//! sscanf-style scanning engine.
//!
//! The structural mirror of [`crate::fmt`]: it walks a format string, but
//! consumes input bytes instead of producing output, yielding one typed
//! [`Conversion`] per unsuppressed directive. The ABI layer turns those into
//! stores through caller-supplied pointers; nothing here touches pointers.
//!
//! Supported: `%d %i %u %o %x %f %e %g %s %c`, `%%`, `*` suppression, width
//! limits and `hh h l ll z` length modifiers. Scansets are not provided.

use crate::convert::{self, ConvertStatus};
use crate::fmt::LengthMod;

/// Typed value produced by one conversion.
///
/// `Bytes` borrows from the scanned input (`%s` and `%c` content).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanValue<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bytes(&'a [u8]),
}

/// One completed, unsuppressed conversion.
#[derive(Debug, Clone, Copy)]
pub struct Conversion<'a> {
    pub value: ScanValue<'a>,
    pub length: LengthMod,
    pub conversion: u8,
}

/// Result of scanning `input` against a format string.
#[derive(Debug)]
pub struct ScanOutcome<'a> {
    pub conversions: Vec<Conversion<'a>>,
    /// Input ran out before the first directive could start matching
    /// (the C-level EOF condition).
    pub input_failure: bool,
}

struct ScanDirective {
    suppress: bool,
    width: Option<usize>,
    length: LengthMod,
    conversion: u8,
}

/// Scan `input` against `fmt`.
///
/// Stops at the first matching failure, returning everything converted up to
/// that point, exactly like the C family.
pub fn scan<'a>(input: &'a [u8], fmt: &[u8]) -> ScanOutcome<'a> {
    let mut out = ScanOutcome {
        conversions: Vec::new(),
        input_failure: false,
    };
    let mut ip = 0; // input position
    let mut fp = 0; // format position

    while fp < fmt.len() {
        let f = fmt[fp];

        if f.is_ascii_whitespace() {
            while fp < fmt.len() && fmt[fp].is_ascii_whitespace() {
                fp += 1;
            }
            ip = skip_whitespace(input, ip);
            continue;
        }

        if f != b'%' {
            if ip < input.len() && input[ip] == f {
                ip += 1;
                fp += 1;
                continue;
            }
            break; // literal mismatch
        }

        // '%' directive.
        fp += 1;
        if fp >= fmt.len() {
            break;
        }
        if fmt[fp] == b'%' {
            fp += 1;
            ip = skip_whitespace(input, ip);
            if ip < input.len() && input[ip] == b'%' {
                ip += 1;
                continue;
            }
            break;
        }

        let Some((dir, consumed)) = parse_scan_directive(&fmt[fp..]) else {
            break;
        };
        fp += consumed;

        if dir.conversion != b'c' {
            ip = skip_whitespace(input, ip);
        }
        if ip >= input.len() {
            // %c with width 0 aside, every conversion needs input bytes.
            if out.conversions.is_empty() {
                out.input_failure = true;
            }
            break;
        }

        let window_end = match dir.width {
            Some(w) => input.len().min(ip + w),
            None => input.len(),
        };
        let window = &input[ip..window_end];

        let matched = match dir.conversion {
            b'd' => match_signed(window, 10),
            b'i' => match_signed(window, 0),
            b'u' => match_unsigned(window, 10),
            b'o' => match_unsigned(window, 8),
            b'x' | b'X' => match_unsigned(window, 16),
            b'f' | b'e' | b'E' | b'g' | b'G' => match_float(window),
            b's' => match_string(window),
            b'c' => match_chars(window, dir.width.unwrap_or(1)),
            _ => None,
        };

        let Some((value, used)) = matched else {
            break;
        };
        ip += used;
        if !dir.suppress {
            out.conversions.push(Conversion {
                value,
                length: dir.length,
                conversion: dir.conversion,
            });
        }
    }

    out
}

fn skip_whitespace(input: &[u8], mut pos: usize) -> usize {
    while pos < input.len() && input[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Parse `[*][width][length]conv` starting after the `%`.
fn parse_scan_directive(fmt: &[u8]) -> Option<(ScanDirective, usize)> {
    let mut pos = 0;
    let len = fmt.len();

    let suppress = pos < len && fmt[pos] == b'*';
    if suppress {
        pos += 1;
    }

    let start = pos;
    while pos < len && fmt[pos].is_ascii_digit() {
        pos += 1;
    }
    let width = if pos > start {
        let mut w = 0_usize;
        for &d in &fmt[start..pos] {
            w = w.saturating_mul(10).saturating_add((d - b'0') as usize);
        }
        if w == 0 {
            return None; // zero width never matches anything
        }
        Some(w)
    } else {
        None
    };

    let length = if pos < len {
        match fmt[pos] {
            b'h' => {
                pos += 1;
                if pos < len && fmt[pos] == b'h' {
                    pos += 1;
                    LengthMod::Hh
                } else {
                    LengthMod::H
                }
            }
            b'l' => {
                pos += 1;
                if pos < len && fmt[pos] == b'l' {
                    pos += 1;
                    LengthMod::Ll
                } else {
                    LengthMod::L
                }
            }
            b'z' => {
                pos += 1;
                LengthMod::Z
            }
            _ => LengthMod::None,
        }
    } else {
        LengthMod::None
    };

    if pos >= len {
        return None;
    }
    let conversion = fmt[pos];
    pos += 1;

    match conversion {
        b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'f' | b'e' | b'E' | b'g' | b'G' | b's'
        | b'c' => {}
        _ => return None,
    }

    Some((
        ScanDirective {
            suppress,
            width,
            length,
            conversion,
        },
        pos,
    ))
}

fn match_signed(window: &[u8], base: i32) -> Option<(ScanValue<'_>, usize)> {
    let p = convert::parse_signed(window, base);
    if p.consumed == 0 || p.status == ConvertStatus::BadBase {
        return None;
    }
    Some((ScanValue::Signed(p.value), p.consumed))
}

fn match_unsigned(window: &[u8], base: i32) -> Option<(ScanValue<'_>, usize)> {
    let p = convert::parse_unsigned(window, base);
    if p.consumed == 0 || p.status == ConvertStatus::BadBase {
        return None;
    }
    Some((ScanValue::Unsigned(p.value), p.consumed))
}

/// Greedy float prefix: sign, digits, fraction, exponent.
fn match_float(window: &[u8]) -> Option<(ScanValue<'_>, usize)> {
    let mut pos = 0;
    let len = window.len();

    if pos < len && (window[pos] == b'-' || window[pos] == b'+') {
        pos += 1;
    }
    let int_start = pos;
    while pos < len && window[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = pos - int_start;

    let mut frac_digits = 0;
    if pos < len && window[pos] == b'.' {
        let dot = pos;
        pos += 1;
        while pos < len && window[pos].is_ascii_digit() {
            pos += 1;
        }
        frac_digits = pos - dot - 1;
        if int_digits == 0 && frac_digits == 0 {
            return None; // lone '.' (possibly after a sign)
        }
    } else if int_digits == 0 {
        return None;
    }

    // Exponent is only consumed when complete.
    if pos < len && (window[pos] == b'e' || window[pos] == b'E') {
        let mut ep = pos + 1;
        if ep < len && (window[ep] == b'-' || window[ep] == b'+') {
            ep += 1;
        }
        let digit_start = ep;
        while ep < len && window[ep].is_ascii_digit() {
            ep += 1;
        }
        if ep > digit_start {
            pos = ep;
        }
    }

    let text = core::str::from_utf8(&window[..pos]).ok()?;
    let value = text.parse::<f64>().ok()?;
    Some((ScanValue::Float(value), pos))
}

fn match_string(window: &[u8]) -> Option<(ScanValue<'_>, usize)> {
    let mut pos = 0;
    while pos < window.len() && !window[pos].is_ascii_whitespace() {
        pos += 1;
    }
    if pos == 0 {
        return None;
    }
    Some((ScanValue::Bytes(&window[..pos]), pos))
}

/// `%c`: exactly `count` bytes, whitespace included, or fail.
fn match_chars(window: &[u8], count: usize) -> Option<(ScanValue<'_>, usize)> {
    if window.len() < count {
        return None;
    }
    Some((ScanValue::Bytes(&window[..count]), count))
}
