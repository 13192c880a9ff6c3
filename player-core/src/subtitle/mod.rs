//! Subtitle handling
//!
//! - Cue parsing from WebVTT-style timed text
//! - Per-language track loading with isolated failures
//! - Active cue lookup for a playback position

pub mod cue;
pub mod fetch;
pub mod parser;
pub mod registry;
pub mod track;
