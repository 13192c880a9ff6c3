//! Media element plumbing
//!
//! - `element`: the host media element seam and its events
//! - `controller`: transport operations and mirrored playback state

pub mod controller;
pub mod element;
