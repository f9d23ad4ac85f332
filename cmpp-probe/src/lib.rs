//! # cmpp-probe — CMPP gateway probe
//!
//! Small operator tool around `cmpp-core`: computes handshake digests
//! for an SP account, checks charset conversions and UCS-2 body lengths,
//! looks up error codes, and tests a gateway link with `ACTIVE_TEST`.

pub mod config;
pub mod probe;
