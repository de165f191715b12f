//! # relaylib-core
//!
//! Pure engines backing the relaylib runtime: printf-style formatting,
//! sscanf-style scanning, numeric conversion and the log priority model.
//! Everything here is safe Rust operating on byte slices; the ABI crate owns
//! all raw-pointer traffic.

#![deny(unsafe_code)]

pub mod convert;
pub mod fmt;
pub mod log;
pub mod scan;
