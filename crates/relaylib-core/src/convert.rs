//! String-to-integer conversion engine (`rl_atoi` / `rl_strtol` backends).

/// Outcome classification for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertStatus {
    Ok,
    Overflow,
    Underflow,
    BadBase,
}

/// Result of parsing a numeric prefix out of a byte string.
#[derive(Debug, Clone, Copy)]
pub struct Parsed<T> {
    pub value: T,
    /// Bytes consumed from the input, strtol-style: 0 when no digits were
    /// found, in which case `value` is 0.
    pub consumed: usize,
    pub status: ConvertStatus,
}

pub fn atoi(s: &[u8]) -> i32 {
    parse_signed(s, 10).value as i32
}

pub fn atol(s: &[u8]) -> i64 {
    parse_signed(s, 10).value
}

/// strtol engine: optional whitespace, optional sign, base inference for 0
/// (leading `0x` → 16, leading `0` → 8, else 10), saturating on overflow.
pub fn parse_signed(s: &[u8], base: i32) -> Parsed<i64> {
    let mut i = 0;
    let len = s.len();

    while i < len && s[i].is_ascii_whitespace() {
        i += 1;
    }

    let mut negative = false;
    if i < len && (s[i] == b'-' || s[i] == b'+') {
        negative = s[i] == b'-';
        i += 1;
    }

    let Some((effective_base, digits_start)) = resolve_base(s, i, base) else {
        return Parsed {
            value: 0,
            consumed: 0,
            status: ConvertStatus::BadBase,
        };
    };
    i = digits_start;

    // Classic cutoff test against the magnitude limit for this sign.
    let abs_max = if negative {
        i64::MIN.unsigned_abs()
    } else {
        i64::MAX as u64
    };
    let cutoff = abs_max / effective_base;
    let cutlim = abs_max % effective_base;

    let mut acc: u64 = 0;
    let mut any_digits = false;
    let mut overflow = false;

    while i < len {
        let Some(digit) = digit_value(s[i], effective_base) else {
            break;
        };
        any_digits = true;
        if !overflow {
            if acc > cutoff || (acc == cutoff && u64::from(digit) > cutlim) {
                overflow = true;
            } else {
                acc = acc * effective_base + u64::from(digit);
            }
        }
        i += 1;
    }

    if !any_digits {
        return Parsed {
            value: 0,
            consumed: 0,
            status: ConvertStatus::Ok,
        };
    }
    if overflow {
        return if negative {
            Parsed {
                value: i64::MIN,
                consumed: i,
                status: ConvertStatus::Underflow,
            }
        } else {
            Parsed {
                value: i64::MAX,
                consumed: i,
                status: ConvertStatus::Overflow,
            }
        };
    }

    let value = if negative {
        (acc as i64).wrapping_neg()
    } else {
        acc as i64
    };
    Parsed {
        value,
        consumed: i,
        status: ConvertStatus::Ok,
    }
}

/// strtoul engine; a leading `-` wraps the accumulated magnitude like the C
/// function does.
pub fn parse_unsigned(s: &[u8], base: i32) -> Parsed<u64> {
    let mut i = 0;
    let len = s.len();

    while i < len && s[i].is_ascii_whitespace() {
        i += 1;
    }

    let mut negative = false;
    if i < len && (s[i] == b'-' || s[i] == b'+') {
        negative = s[i] == b'-';
        i += 1;
    }

    let Some((effective_base, digits_start)) = resolve_base(s, i, base) else {
        return Parsed {
            value: 0,
            consumed: 0,
            status: ConvertStatus::BadBase,
        };
    };
    i = digits_start;

    let cutoff = u64::MAX / effective_base;
    let cutlim = u64::MAX % effective_base;

    let mut acc: u64 = 0;
    let mut any_digits = false;
    let mut overflow = false;

    while i < len {
        let Some(digit) = digit_value(s[i], effective_base) else {
            break;
        };
        any_digits = true;
        if !overflow {
            if acc > cutoff || (acc == cutoff && u64::from(digit) > cutlim) {
                overflow = true;
            } else {
                acc = acc * effective_base + u64::from(digit);
            }
        }
        i += 1;
    }

    if !any_digits {
        return Parsed {
            value: 0,
            consumed: 0,
            status: ConvertStatus::Ok,
        };
    }
    if overflow {
        return Parsed {
            value: u64::MAX,
            consumed: i,
            status: ConvertStatus::Overflow,
        };
    }
    Parsed {
        value: if negative { acc.wrapping_neg() } else { acc },
        consumed: i,
        status: ConvertStatus::Ok,
    }
}

/// Resolve the effective base and the index where digits begin.
///
/// Returns `None` for bases outside {0} ∪ [2, 36].
fn resolve_base(s: &[u8], start: usize, base: i32) -> Option<(u64, usize)> {
    let len = s.len();
    let mut i = start;

    let has_hex_prefix = i + 1 < len
        && s[i] == b'0'
        && (s[i + 1] == b'x' || s[i + 1] == b'X')
        && i + 2 < len
        && s[i + 2].is_ascii_hexdigit();

    let effective = if base == 0 {
        if has_hex_prefix {
            i += 2;
            16
        } else if i < len && s[i] == b'0' {
            8
        } else {
            10
        }
    } else {
        if base == 16 && has_hex_prefix {
            i += 2;
        }
        base as u64
    };

    if !(2..=36).contains(&effective) {
        return None;
    }
    Some((effective, i))
}

fn digit_value(c: u8, base: u64) -> Option<u8> {
    let digit = match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'z' => c - b'a' + 10,
        b'A'..=b'Z' => c - b'A' + 10,
        _ => return None,
    };
    if u64::from(digit) < base { Some(digit) } else { None }
}
