//! Safe wrappers over the relaylib C surface for the demo binary.
//!
//! Everything here goes through the exported faces the way an external
//! consumer would: format strings travel as C strings, arguments travel as
//! counted packs, results come back through pointers. The wrappers confine
//! the unsafety and hand the CLI plain Rust types.

use std::ffi::{CStr, CString, c_char, c_int, c_long, c_longlong, c_uint, c_ulong, c_ulonglong};

use thiserror::Error;

use relaylib_abi::{args, entry, stubs, table, varargs};

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("argument `{0}` is not `kind:value`")]
    ArgShape(String),
    #[error("unknown argument kind `{0}` (expected int, uint, float, char, or str)")]
    ArgKind(String),
    #[error("bad {kind} value `{value}`")]
    ArgValue { kind: &'static str, value: String },
    #[error("`{0}` contains an interior NUL byte")]
    InteriorNul(String),
    #[error("the renderer rejected the format string")]
    Render,
    #[error("the format string holds no conversions to store")]
    NoConversions,
    #[error("scan conversion `%{0}` is not supported here")]
    ScanConversion(char),
    #[error("scan length modifier `{0}` is not supported here")]
    ScanLength(&'static str),
}

fn bad(kind: &'static str, value: &str) -> DemoError {
    DemoError::ArgValue {
        kind,
        value: value.to_owned(),
    }
}

fn c_string(text: &str) -> Result<CString, DemoError> {
    CString::new(text).map_err(|_| DemoError::InteriorNul(text.to_owned()))
}

// ---------------------------------------------------------------------------
// Argument packs
// ---------------------------------------------------------------------------

/// One typed argument for a formatted call, parsed from a `kind:value` token.
///
/// `Str` owns its C string so the pack word it contributes stays valid for
/// the duration of the call.
#[derive(Debug)]
pub enum PackArg {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(u8),
    Str(CString),
}

impl PackArg {
    pub fn parse(token: &str) -> Result<Self, DemoError> {
        let Some((kind, value)) = token.split_once(':') else {
            return Err(DemoError::ArgShape(token.to_owned()));
        };
        match kind {
            "int" => value
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|_| bad("int", value)),
            "uint" => parse_uint(value).map(Self::Uint).ok_or_else(|| bad("uint", value)),
            "float" => value
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| bad("float", value)),
            "char" => match value.as_bytes() {
                [b] => Ok(Self::Char(*b)),
                _ => Err(bad("char", value)),
            },
            "str" => c_string(value).map(Self::Str),
            other => Err(DemoError::ArgKind(other.to_owned())),
        }
    }

    fn word(&self) -> u64 {
        match self {
            Self::Int(v) => args::arg_i64(*v),
            Self::Uint(v) => args::arg_u64(*v),
            Self::Float(v) => args::arg_f64(*v),
            Self::Char(v) => args::arg_char(*v),
            Self::Str(s) => args::arg_cstr(s.as_ptr()),
        }
    }
}

/// Accepts decimal or `0x` hex.
fn parse_uint(value: &str) -> Option<u64> {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        value.parse::<u64>().ok()
    }
}

pub fn parse_pack(tokens: &[String]) -> Result<Vec<PackArg>, DemoError> {
    tokens.iter().map(|t| PackArg::parse(t)).collect()
}

fn pack_words(packed: &[PackArg]) -> Vec<u64> {
    packed.iter().map(PackArg::word).collect()
}

// ---------------------------------------------------------------------------
// Formatted output
// ---------------------------------------------------------------------------

/// Render `format` with `packed` through the shared `snprintf` face.
pub fn render(format: &str, packed: &[PackArg]) -> Result<String, DemoError> {
    let fmt = c_string(format)?;
    let words = pack_words(packed);

    // Probe pass sizes the buffer, second pass fills it.
    let needed = unsafe {
        varargs::rl_snprintf(
            std::ptr::null_mut(),
            0,
            fmt.as_ptr(),
            words.as_ptr(),
            words.len(),
        )
    };
    if needed < 0 {
        return Err(DemoError::Render);
    }
    let mut buf = vec![0u8; needed as usize + 1];
    let written = unsafe {
        varargs::rl_snprintf(
            buf.as_mut_ptr().cast(),
            buf.len(),
            fmt.as_ptr(),
            words.as_ptr(),
            words.len(),
        )
    };
    if written < 0 {
        return Err(DemoError::Render);
    }
    buf.truncate(needed as usize);
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// ---------------------------------------------------------------------------
// Formatted scanning
// ---------------------------------------------------------------------------

/// A value stored by one scan conversion.
#[derive(Debug, PartialEq)]
pub enum ScannedField {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

const SCAN_TEXT_CAP: usize = 256;

/// Width-exact destination for one conversion; the store side writes through
/// the pointer with the width the length modifier names, so each variant
/// boxes exactly that type.
enum Dest {
    Int(Box<c_int>),
    Long(Box<c_long>),
    LongLong(Box<c_longlong>),
    Size(Box<isize>),
    Uint(Box<c_uint>),
    Ulong(Box<c_ulong>),
    UlongLong(Box<c_ulonglong>),
    Usize(Box<usize>),
    F32(Box<f32>),
    F64(Box<f64>),
    Text(Vec<u8>),
}

impl Dest {
    fn word(&mut self) -> u64 {
        match self {
            Self::Int(b) => args::arg_ptr(&raw mut **b),
            Self::Long(b) => args::arg_ptr(&raw mut **b),
            Self::LongLong(b) => args::arg_ptr(&raw mut **b),
            Self::Size(b) => args::arg_ptr(&raw mut **b),
            Self::Uint(b) => args::arg_ptr(&raw mut **b),
            Self::Ulong(b) => args::arg_ptr(&raw mut **b),
            Self::UlongLong(b) => args::arg_ptr(&raw mut **b),
            Self::Usize(b) => args::arg_ptr(&raw mut **b),
            Self::F32(b) => args::arg_ptr(&raw mut **b),
            Self::F64(b) => args::arg_ptr(&raw mut **b),
            Self::Text(v) => args::arg_ptr(v.as_mut_ptr()),
        }
    }

    fn take(self) -> ScannedField {
        match self {
            Self::Int(b) => ScannedField::Int(i64::from(*b)),
            Self::Long(b) => ScannedField::Int(*b as i64),
            Self::LongLong(b) => ScannedField::Int(*b),
            Self::Size(b) => ScannedField::Int(*b as i64),
            Self::Uint(b) => ScannedField::Uint(u64::from(*b)),
            Self::Ulong(b) => ScannedField::Uint(*b as u64),
            Self::UlongLong(b) => ScannedField::Uint(*b),
            Self::Usize(b) => ScannedField::Uint(*b as u64),
            Self::F32(b) => ScannedField::Float(f64::from(*b)),
            Self::F64(b) => ScannedField::Float(*b),
            Self::Text(raw) => {
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                ScannedField::Text(String::from_utf8_lossy(&raw[..end]).into_owned())
            }
        }
    }
}

/// Walk the format and allocate one destination per unsuppressed conversion.
fn scan_dests(fmt: &[u8]) -> Result<Vec<Dest>, DemoError> {
    let mut dests = Vec::new();
    let mut i = 0;
    while i < fmt.len() {
        if fmt[i] != b'%' {
            i += 1;
            continue;
        }
        i += 1;
        if i < fmt.len() && fmt[i] == b'%' {
            i += 1;
            continue;
        }
        let suppressed = i < fmt.len() && fmt[i] == b'*';
        if suppressed {
            i += 1;
        }
        while i < fmt.len() && fmt[i].is_ascii_digit() {
            i += 1;
        }
        let mut long_count = 0;
        let mut half = false;
        let mut size_mod = false;
        while i < fmt.len() {
            match fmt[i] {
                b'l' => long_count += 1,
                b'h' => half = true,
                b'z' => size_mod = true,
                _ => break,
            }
            i += 1;
        }
        if i >= fmt.len() {
            break;
        }
        let conversion = fmt[i];
        i += 1;
        if suppressed {
            continue;
        }
        if half {
            return Err(DemoError::ScanLength("h"));
        }
        let dest = match conversion {
            b'd' | b'i' => match (long_count, size_mod) {
                (0, false) => Dest::Int(Box::new(0)),
                (1, false) => Dest::Long(Box::new(0)),
                (_, false) => Dest::LongLong(Box::new(0)),
                (_, true) => Dest::Size(Box::new(0)),
            },
            b'u' | b'o' | b'x' | b'X' => match (long_count, size_mod) {
                (0, false) => Dest::Uint(Box::new(0)),
                (1, false) => Dest::Ulong(Box::new(0)),
                (_, false) => Dest::UlongLong(Box::new(0)),
                (_, true) => Dest::Usize(Box::new(0)),
            },
            b'f' | b'e' | b'E' | b'g' | b'G' => {
                if long_count > 0 {
                    Dest::F64(Box::new(0.0))
                } else {
                    Dest::F32(Box::new(0.0))
                }
            }
            b's' | b'c' => Dest::Text(vec![0; SCAN_TEXT_CAP]),
            other => return Err(DemoError::ScanConversion(other as char)),
        };
        dests.push(dest);
    }
    Ok(dests)
}

/// Scan `input` against `format` through the shared `sscanf` face.
///
/// Returns the raw match count alongside the stored fields; a negative
/// count is the input-failure report, passed through untouched.
pub fn scan(input: &str, format: &str) -> Result<(c_int, Vec<ScannedField>), DemoError> {
    let c_input = c_string(input)?;
    let c_fmt = c_string(format)?;
    let mut dests = scan_dests(format.as_bytes())?;
    if dests.is_empty() {
        return Err(DemoError::NoConversions);
    }

    let words: Vec<u64> = dests.iter_mut().map(Dest::word).collect();
    let matched = unsafe {
        varargs::rl_sscanf(
            c_input.as_ptr(),
            c_fmt.as_ptr(),
            words.as_ptr(),
            words.len(),
        )
    };
    if matched < 0 {
        return Ok((matched, Vec::new()));
    }
    let stored = dests
        .into_iter()
        .take(matched as usize)
        .map(Dest::take)
        .collect();
    Ok((matched, stored))
}

// ---------------------------------------------------------------------------
// Error slot and logging
// ---------------------------------------------------------------------------

pub fn set_error(format: &str, packed: &[PackArg]) -> Result<(), DemoError> {
    let fmt = c_string(format)?;
    let words = pack_words(packed);
    unsafe { varargs::rl_set_error(fmt.as_ptr(), words.as_ptr(), words.len()) };
    Ok(())
}

pub fn last_error() -> String {
    let p = unsafe { stubs::rl_get_error() };
    unsafe { CStr::from_ptr(p) }
        .to_string_lossy()
        .into_owned()
}

pub fn clear_error() {
    unsafe { stubs::rl_clear_error() };
}

pub fn log_message(priority: c_int, message: &str) -> Result<(), DemoError> {
    let text = c_string(message)?;
    let pack = [args::arg_cstr(text.as_ptr())];
    unsafe { varargs::rl_log_message(priority, c"%s".as_ptr(), pack.as_ptr(), pack.len()) };
    Ok(())
}

pub fn set_log_threshold(priority: c_int) {
    unsafe { stubs::rl_log_set_priority(priority) };
}

pub fn log_threshold() -> c_int {
    unsafe { stubs::rl_log_get_priority() }
}

// ---------------------------------------------------------------------------
// Surface geometry and negotiation
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SurfaceInfo {
    pub packed_version: c_int,
    pub revision: String,
    pub contract_version: u32,
    pub slots: usize,
    pub table_bytes: usize,
}

pub fn surface_info() -> SurfaceInfo {
    let revision = unsafe { CStr::from_ptr(stubs::rl_get_revision()) }
        .to_string_lossy()
        .into_owned();
    SurfaceInfo {
        packed_version: unsafe { stubs::rl_get_version() },
        revision,
        contract_version: relaylib_abi::RELAY_API_VERSION,
        slots: table::SLOT_COUNT,
        table_bytes: table::table_size(),
    }
}

#[derive(Debug)]
pub struct NegotiationProbe {
    pub code: i32,
    pub filled_slots: usize,
}

/// Drive the exported entry point the way an embedding loader would,
/// against a local buffer.
pub fn probe_entry(version: u32, declared_size: usize) -> NegotiationProbe {
    let mut slots = vec![0usize; table::SLOT_COUNT];
    let code = unsafe {
        entry::rl_relay_entry(version, slots.as_mut_ptr().cast(), declared_size as u32)
    };
    NegotiationProbe {
        code,
        filled_slots: slots.iter().filter(|&&s| s != 0).count(),
    }
}
