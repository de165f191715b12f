//! Log priority model and line composition.
//!
//! The ABI layer owns the fd write and the threshold atomic; this module
//! keeps the pure parts: priority numbering, labels and the line prefix.

pub const PRIORITY_DEBUG: i32 = 0;
pub const PRIORITY_INFO: i32 = 1;
pub const PRIORITY_WARN: i32 = 2;
pub const PRIORITY_ERROR: i32 = 3;

/// Default threshold: debug lines are dropped unless lowered.
pub const DEFAULT_PRIORITY: i32 = PRIORITY_INFO;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Debug,
    Info,
    Warn,
    Error,
}

impl Priority {
    /// Clamp a raw C-side priority value into the known range.
    pub fn from_raw(raw: i32) -> Priority {
        match raw {
            i32::MIN..=PRIORITY_DEBUG => Priority::Debug,
            PRIORITY_INFO => Priority::Info,
            PRIORITY_WARN => Priority::Warn,
            _ => Priority::Error,
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Priority::Debug => PRIORITY_DEBUG,
            Priority::Info => PRIORITY_INFO,
            Priority::Warn => PRIORITY_WARN,
            Priority::Error => PRIORITY_ERROR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Debug => "DEBUG",
            Priority::Info => "INFO",
            Priority::Warn => "WARN",
            Priority::Error => "ERROR",
        }
    }
}

/// Compose a full log line `relaylib: LABEL: message\n` into `out`.
///
/// `message` is raw bytes (already rendered, possibly truncated upstream).
pub fn compose_line(priority: Priority, message: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(b"relaylib: ");
    out.extend_from_slice(priority.label().as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(message);
    out.push(b'\n');
}
