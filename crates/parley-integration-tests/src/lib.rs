//! Integration test crate for the parley negotiation engine.
//!
//! This crate exists solely to run end-to-end sessions across parley-core and
//! parley-agent. It has no public API; everything lives in `tests/`.

#![forbid(unsafe_code)]
