//! Crate-level test support
//!
//! - Fake host collaborators (media element, fullscreen container)
//! - An in-memory subtitle fetcher with optional latency
//! - Mounted-player scenarios driven through user intents

pub mod fixtures;
