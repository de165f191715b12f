//! printf-style formatting engine.
//!
//! Parses `%`-directives and renders typed arguments into a byte sink with
//! width/precision/flag support. The ABI layer narrows argument-pack words
//! per directive and drives the renderers here; nothing in this module
//! touches raw pointers.
//!
//! Bounded by construction: a single directive can expand to at most
//! `MAX_FIELD_WIDTH + 64` bytes (padding + sign + prefix + digits).

/// Hard cap on field width honored by the padding helpers.
pub const MAX_FIELD_WIDTH: usize = 4096;

// ---------------------------------------------------------------------------
// Directive types
// ---------------------------------------------------------------------------

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

/// Precision specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

/// Length modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    Hh, // 'hh'
    H,  // 'h'
    L,  // 'l'
    Ll, // 'll'
    Z,  // 'z'
}

/// A parsed conversion directive.
#[derive(Debug, Clone)]
pub struct Directive {
    pub flags: Flags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: u8,
}

/// Typed argument value consumed by one directive.
///
/// String content travels out-of-band as a byte slice (see [`format_str`])
/// since a fixed-size value cannot own it.
#[derive(Debug, Clone, Copy)]
pub enum FormatArg {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Char(u8),
    Pointer(usize),
}

/// One piece of a parsed format string.
#[derive(Debug, Clone)]
pub enum Segment<'a> {
    /// Literal bytes emitted verbatim.
    Literal(&'a [u8]),
    /// A `%%` escape.
    Percent,
    /// A conversion directive consuming argument(s).
    Directive(Directive),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse one directive starting just after the `%`.
///
/// Returns `(directive, bytes_consumed)` counting from `fmt[0]`, or `None`
/// when the directive is malformed or uses a conversion this engine does not
/// provide.
pub fn parse_directive(fmt: &[u8]) -> Option<(Directive, usize)> {
    let mut pos = 0;
    let len = fmt.len();

    let mut flags = Flags::default();
    while pos < len {
        match fmt[pos] {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }
    // '+' overrides ' '; '-' overrides '0'.
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    let width = if pos < len && fmt[pos] == b'*' {
        pos += 1;
        Width::FromArg
    } else {
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos > start {
            Width::Fixed(parse_decimal(&fmt[start..pos]))
        } else {
            Width::None
        }
    };

    let precision = if pos < len && fmt[pos] == b'.' {
        pos += 1;
        if pos < len && fmt[pos] == b'*' {
            pos += 1;
            Precision::FromArg
        } else {
            let start = pos;
            while pos < len && fmt[pos].is_ascii_digit() {
                pos += 1;
            }
            Precision::Fixed(if pos > start {
                parse_decimal(&fmt[start..pos])
            } else {
                0
            })
        }
    } else {
        Precision::None
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
        b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'c' | b's' | b'p' | b'f' | b'F' | b'e'
        | b'E' | b'g' | b'G' => {}
        _ => return None,
    }

    Some((
        Directive {
            flags,
            width,
            precision,
            length,
            conversion,
        },
        pos,
    ))
}

/// Split a format string into literal runs, `%%` escapes and directives.
///
/// A malformed directive (or a trailing lone `%`) degrades to a literal `%`
/// so the renderer never loses bytes.
pub fn parse_format(fmt: &[u8]) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let len = fmt.len();

    while pos < len {
        let start = pos;
        while pos < len && fmt[pos] != b'%' {
            pos += 1;
        }
        if pos > start {
            segments.push(Segment::Literal(&fmt[start..pos]));
        }
        if pos >= len {
            break;
        }
        pos += 1; // consume '%'
        if pos >= len {
            segments.push(Segment::Literal(&fmt[pos - 1..pos]));
            break;
        }
        if fmt[pos] == b'%' {
            segments.push(Segment::Percent);
            pos += 1;
            continue;
        }
        if let Some((dir, consumed)) = parse_directive(&fmt[pos..]) {
            pos += consumed;
            segments.push(Segment::Directive(dir));
        } else {
            segments.push(Segment::Literal(&fmt[pos - 1..pos]));
        }
    }
    segments
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Render a signed integer according to `dir`.
pub fn format_signed(value: i64, dir: &Directive, out: &mut Vec<u8>) {
    let negative = value < 0;
    let magnitude = value.unsigned_abs();
    let sign = if negative {
        Some(b'-')
    } else if dir.flags.force_sign {
        Some(b'+')
    } else if dir.flags.space_sign {
        Some(b' ')
    } else {
        None
    };
    emit_int(magnitude, sign, dir, value == 0, out);
}

/// Render an unsigned integer according to `dir`.
pub fn format_unsigned(value: u64, dir: &Directive, out: &mut Vec<u8>) {
    emit_int(value, None, dir, value == 0, out);
}

fn emit_int(magnitude: u64, sign: Option<u8>, dir: &Directive, is_zero: bool, out: &mut Vec<u8>) {
    let (base, uppercase) = int_base(dir.conversion);
    let mut digits = [0u8; 64];
    let digit_count = render_digits(magnitude, base, uppercase, &mut digits);
    let digit_slice = &digits[64 - digit_count..];

    // Precision is the minimum digit count; explicit 0 with value 0 emits
    // no digits at all.
    let precision = match dir.precision {
        Precision::Fixed(p) => p,
        _ => 1,
    };
    let zero_prefix = precision.saturating_sub(digit_count);
    let suppress_digits = is_zero && matches!(dir.precision, Precision::Fixed(0));

    // '#' prefixes only non-zero values.
    let prefix = if is_zero {
        b"" as &[u8]
    } else {
        alt_prefix(dir)
    };

    let content = if suppress_digits {
        sign.is_some() as usize + prefix.len()
    } else {
        sign.is_some() as usize + prefix.len() + zero_prefix + digit_count
    };
    let pad_total = field_width(dir).saturating_sub(content);
    // An explicit precision turns off '0' for the integer conversions.
    let zero_pad = dir.flags.zero_pad && !matches!(dir.precision, Precision::Fixed(_));

    if !dir.flags.left_justify && !zero_pad {
        pad(out, b' ', pad_total);
    }
    if let Some(s) = sign {
        out.push(s);
    }
    out.extend_from_slice(prefix);
    if !dir.flags.left_justify && zero_pad {
        pad(out, b'0', pad_total);
    }
    if !suppress_digits {
        pad(out, b'0', zero_prefix);
        out.extend_from_slice(digit_slice);
    }
    if dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// Render a float according to `dir` (`f`/`e`/`g` families).
pub fn format_float(value: f64, dir: &Directive, out: &mut Vec<u8>) {
    let precision = match dir.precision {
        Precision::Fixed(p) => p,
        _ => 6,
    };
    let uppercase = dir.conversion.is_ascii_uppercase();

    if value.is_nan() {
        let s: &[u8] = if uppercase { b"NAN" } else { b"nan" };
        return emit_plain(s, dir, out);
    }
    if value.is_infinite() {
        let s: &[u8] = match (uppercase, value > 0.0) {
            (true, true) => b"INF",
            (true, false) => b"-INF",
            (false, true) => b"inf",
            (false, false) => b"-inf",
        };
        return emit_plain(s, dir, out);
    }

    let negative = value.is_sign_negative();
    let body = match dir.conversion | 0x20 {
        b'e' => float_exp(value.abs(), precision, uppercase),
        b'g' => float_shortest(value.abs(), precision, uppercase, dir.flags.alt_form),
        _ => float_fixed(value.abs(), precision, dir.flags.alt_form),
    };

    let sign = if negative {
        Some(b'-')
    } else if dir.flags.force_sign {
        Some(b'+')
    } else if dir.flags.space_sign {
        Some(b' ')
    } else {
        None
    };

    let content = sign.is_some() as usize + body.len();
    let pad_total = field_width(dir).saturating_sub(content);

    if !dir.flags.left_justify && !dir.flags.zero_pad {
        pad(out, b' ', pad_total);
    }
    if let Some(s) = sign {
        out.push(s);
    }
    if !dir.flags.left_justify && dir.flags.zero_pad {
        pad(out, b'0', pad_total);
    }
    out.extend_from_slice(body.as_bytes());
    if dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// Render string content (precision truncates, width pads).
pub fn format_str(s: &[u8], dir: &Directive, out: &mut Vec<u8>) {
    let max_len = match dir.precision {
        Precision::Fixed(p) => p,
        _ => s.len(),
    };
    let effective = &s[..s.len().min(max_len)];
    let pad_total = field_width(dir).saturating_sub(effective.len());

    if !dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    out.extend_from_slice(effective);
    if dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// Render a single character with width padding.
pub fn format_char(c: u8, dir: &Directive, out: &mut Vec<u8>) {
    let pad_total = field_width(dir).saturating_sub(1);
    if !dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    out.push(c);
    if dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// Render a pointer as `0x...`, or `(nil)` for null.
pub fn format_pointer(addr: usize, dir: &Directive, out: &mut Vec<u8>) {
    if addr == 0 {
        return emit_plain(b"(nil)", dir, out);
    }
    let mut digits = [0u8; 64];
    let count = render_digits(addr as u64, 16, false, &mut digits);
    let content = 2 + count;
    let pad_total = field_width(dir).saturating_sub(content);

    if !dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    out.extend_from_slice(b"0x");
    out.extend_from_slice(&digits[64 - count..]);
    if dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_decimal(digits: &[u8]) -> usize {
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add((d - b'0') as usize);
    }
    result
}

fn field_width(dir: &Directive) -> usize {
    match dir.width {
        Width::Fixed(w) => w.min(MAX_FIELD_WIDTH),
        // FromArg widths are resolved into Fixed by the pack decoder.
        _ => 0,
    }
}

fn int_base(conversion: u8) -> (u64, bool) {
    match conversion {
        b'o' => (8, false),
        b'x' => (16, false),
        b'X' => (16, true),
        _ => (10, false),
    }
}

/// Render `value` right-aligned into the tail of `buf`, returning the digit
/// count.
fn render_digits(mut value: u64, base: u64, uppercase: bool, buf: &mut [u8; 64]) -> usize {
    if value == 0 {
        buf[63] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = 64;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    64 - pos
}

fn alt_prefix(dir: &Directive) -> &'static [u8] {
    if !dir.flags.alt_form {
        return b"";
    }
    match dir.conversion {
        b'o' => b"0",
        b'x' => b"0x",
        b'X' => b"0X",
        _ => b"",
    }
}

fn pad(out: &mut Vec<u8>, byte: u8, count: usize) {
    let count = count.min(MAX_FIELD_WIDTH);
    for _ in 0..count {
        out.push(byte);
    }
}

/// Emit fixed content (special values, `(nil)`) with width/justify only.
fn emit_plain(s: &[u8], dir: &Directive, out: &mut Vec<u8>) {
    let pad_total = field_width(dir).saturating_sub(s.len());
    if !dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
    out.extend_from_slice(s);
    if dir.flags.left_justify {
        pad(out, b' ', pad_total);
    }
}

/// `%f`: fixed-point decimal via the std digit generator.
fn float_fixed(value: f64, precision: usize, alt_form: bool) -> String {
    if precision == 0 {
        let rounded = value.round() as u64;
        if alt_form {
            format!("{rounded}.")
        } else {
            format!("{rounded}")
        }
    } else {
        format!("{value:.precision$}")
    }
}

/// `%e`: scientific notation with a two-digit exponent.
fn float_exp(value: f64, precision: usize, uppercase: bool) -> String {
    let e_char = if uppercase { 'E' } else { 'e' };
    if value == 0.0 {
        return if precision == 0 {
            format!("0{e_char}+00")
        } else {
            format!("0.{:0>width$}{e_char}+00", "", width = precision)
        };
    }
    let mut exp = value.log10().floor() as i32;
    let mut mantissa = value / 10_f64.powi(exp);
    // log10 of values like 999.9999 can land one power low after division.
    if mantissa >= 10.0 {
        mantissa /= 10.0;
        exp += 1;
    }
    let sign = if exp < 0 { '-' } else { '+' };
    let abs_exp = exp.unsigned_abs();
    if precision == 0 {
        format!("{}{e_char}{sign}{abs_exp:02}", mantissa.round() as u64)
    } else {
        format!("{mantissa:.precision$}{e_char}{sign}{abs_exp:02}")
    }
}

/// `%g`: `%f` or `%e`, whichever is shorter by the POSIX exponent rule,
/// with trailing zeros stripped unless `#` is present.
fn float_shortest(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> String {
    let p = if precision == 0 { 1 } else { precision };

    if value == 0.0 {
        if alt_form && p > 1 {
            return format!("0.{:0>width$}", "", width = p - 1);
        }
        return "0".into();
    }

    let exp = value.log10().floor() as i32;
    if exp >= -4 && exp < p as i32 {
        let frac_digits = (p as i32 - 1 - exp).max(0) as usize;
        let mut s = format!("{value:.frac_digits$}");
        if !alt_form {
            strip_trailing_zeros(&mut s);
        }
        s
    } else {
        let mut s = float_exp(value, p.saturating_sub(1), uppercase);
        if !alt_form
            && let Some(e_pos) = s.bytes().position(|b| b == b'e' || b == b'E')
        {
            let mut mantissa = s[..e_pos].to_string();
            strip_trailing_zeros(&mut mantissa);
            let exp_part = &s[e_pos..];
            s = format!("{mantissa}{exp_part}");
        }
        s
    }
}

fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(spec: &str) -> Directive {
        let (d, consumed) = parse_directive(spec.as_bytes()).expect("directive parses");
        assert_eq!(consumed, spec.len());
        d
    }

    fn fmt_signed(spec: &str, value: i64) -> String {
        let mut out = Vec::new();
        format_signed(value, &dir(spec), &mut out);
        String::from_utf8(out).unwrap()
    }

    fn fmt_unsigned(spec: &str, value: u64) -> String {
        let mut out = Vec::new();
        format_unsigned(value, &dir(spec), &mut out);
        String::from_utf8(out).unwrap()
    }

    fn fmt_float(spec: &str, value: f64) -> String {
        let mut out = Vec::new();
        format_float(value, &dir(spec), &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_plain_conversion() {
        let d = dir("d");
        assert_eq!(d.conversion, b'd');
        assert_eq!(d.width, Width::None);
        assert_eq!(d.precision, Precision::None);
        assert_eq!(d.length, LengthMod::None);
    }

    #[test]
    fn parse_width_and_precision() {
        let d = dir("10.3f");
        assert_eq!(d.width, Width::Fixed(10));
        assert_eq!(d.precision, Precision::Fixed(3));
    }

    #[test]
    fn parse_flag_overrides() {
        let d = dir("-0+ d");
        assert!(d.flags.left_justify);
        assert!(d.flags.force_sign);
        assert!(!d.flags.zero_pad); // '-' wins
        assert!(!d.flags.space_sign); // '+' wins
    }

    #[test]
    fn parse_length_modifiers() {
        assert_eq!(dir("hhd").length, LengthMod::Hh);
        assert_eq!(dir("hd").length, LengthMod::H);
        assert_eq!(dir("ld").length, LengthMod::L);
        assert_eq!(dir("llu").length, LengthMod::Ll);
        assert_eq!(dir("zu").length, LengthMod::Z);
    }

    #[test]
    fn parse_star_width_and_precision() {
        assert_eq!(dir("*d").width, Width::FromArg);
        assert_eq!(dir(".*f").precision, Precision::FromArg);
    }

    #[test]
    fn parse_rejects_unknown_conversion() {
        assert!(parse_directive(b"q").is_none());
    }

    #[test]
    fn segments_of_mixed_format() {
        let segs = parse_format(b"v=%d (%s) 100%%");
        assert_eq!(segs.len(), 6);
        assert!(matches!(segs[0], Segment::Literal(b"v=")));
        assert!(matches!(&segs[1], Segment::Directive(d) if d.conversion == b'd'));
        assert!(matches!(segs[2], Segment::Literal(b" (")));
        assert!(matches!(&segs[3], Segment::Directive(d) if d.conversion == b's'));
        assert!(matches!(segs[4], Segment::Literal(b") 100")));
        assert!(matches!(segs[5], Segment::Percent));
    }

    #[test]
    fn trailing_percent_is_literal() {
        let segs = parse_format(b"abc%");
        assert_eq!(segs.len(), 2);
        assert!(matches!(segs[1], Segment::Literal(b"%")));
    }

    #[test]
    fn signed_basic_and_negative() {
        assert_eq!(fmt_signed("d", 42), "42");
        assert_eq!(fmt_signed("d", -123), "-123");
        assert_eq!(fmt_signed("d", i64::MIN), "-9223372036854775808");
    }

    #[test]
    fn signed_width_padding() {
        assert_eq!(fmt_signed("8d", 42), "      42");
        assert_eq!(fmt_signed("-8d", 42), "42      ");
        assert_eq!(fmt_signed("08d", -42), "-0000042");
    }

    #[test]
    fn signed_sign_flags() {
        assert_eq!(fmt_signed("+d", 7), "+7");
        assert_eq!(fmt_signed(" d", 7), " 7");
    }

    #[test]
    fn signed_precision_pads_digits() {
        assert_eq!(fmt_signed(".5d", 42), "00042");
        assert_eq!(fmt_signed("8.5d", 42), "   00042");
    }

    #[test]
    fn precision_disables_zero_flag_for_integers() {
        assert_eq!(fmt_signed("08.3d", 42), "     042");
        assert_eq!(fmt_unsigned("08.3x", 255), "     0ff");
    }

    #[test]
    fn zero_with_zero_precision_is_empty() {
        assert_eq!(fmt_signed(".0d", 0), "");
        assert_eq!(fmt_unsigned(".0u", 0), "");
    }

    #[test]
    fn unsigned_hex_octal_alt_forms() {
        assert_eq!(fmt_unsigned("x", 255), "ff");
        assert_eq!(fmt_unsigned("X", 255), "FF");
        assert_eq!(fmt_unsigned("#x", 255), "0xff");
        assert_eq!(fmt_unsigned("#o", 8), "010");
        assert_eq!(fmt_unsigned("#x", 0), "0");
    }

    #[test]
    fn float_default_precision() {
        assert_eq!(fmt_float("f", 3.5), "3.500000");
        assert_eq!(fmt_float(".2f", 3.14159), "3.14");
        assert_eq!(fmt_float(".0f", 2.5), "3");
    }

    #[test]
    fn float_specials() {
        assert_eq!(fmt_float("f", f64::NAN), "nan");
        assert_eq!(fmt_float("F", f64::INFINITY), "INF");
        assert_eq!(fmt_float("8f", f64::NEG_INFINITY), "    -inf");
    }

    #[test]
    fn float_exponent_form() {
        assert_eq!(fmt_float(".2e", 12345.0), "1.23e+04");
        assert_eq!(fmt_float(".1e", 0.00321), "3.2e-03");
        assert_eq!(fmt_float("e", 0.0), "0.000000e+00");
    }

    #[test]
    fn float_shortest_form() {
        assert_eq!(fmt_float("g", 100.0), "100");
        assert_eq!(fmt_float("g", 0.0001), "0.0001");
        assert_eq!(fmt_float("g", 0.00001), "1e-05");
        assert_eq!(fmt_float("g", 0.0), "0");
    }

    #[test]
    fn string_precision_truncates() {
        let mut out = Vec::new();
        format_str(b"hello world", &dir(".5s"), &mut out);
        assert_eq!(&out, b"hello");
    }

    #[test]
    fn string_width_pads() {
        let mut out = Vec::new();
        format_str(b"hi", &dir("5s"), &mut out);
        assert_eq!(&out, b"   hi");
        out.clear();
        format_str(b"hi", &dir("-5s"), &mut out);
        assert_eq!(&out, b"hi   ");
    }

    #[test]
    fn char_with_width() {
        let mut out = Vec::new();
        format_char(b'x', &dir("3c"), &mut out);
        assert_eq!(&out, b"  x");
    }

    #[test]
    fn pointer_rendering() {
        let mut out = Vec::new();
        format_pointer(0xdead_beef, &dir("p"), &mut out);
        assert_eq!(&out, b"0xdeadbeef");
        out.clear();
        format_pointer(0, &dir("p"), &mut out);
        assert_eq!(&out, b"(nil)");
    }

    #[test]
    fn width_is_capped() {
        let s = fmt_signed("9999999d", 1);
        assert_eq!(s.len(), MAX_FIELD_WIDTH);
    }
}
