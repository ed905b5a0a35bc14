//! Vendor-neutral type definitions shared by the model traits and providers.
//!
//! `v2` carries the language model surface (prompt, call options, content,
//! stream parts). `transcription` and `speech` carry the audio model
//! surfaces. `json` and `usage` hold small parsing helpers used by providers.

pub mod json;
pub mod speech;
pub mod transcription;
pub mod usage;
pub mod v2;

#[cfg(test)]
#[path = "../tests/json_tests.rs"]
mod json_tests;

#[cfg(test)]
#[path = "../tests/usage_tests.rs"]
mod usage_tests;
