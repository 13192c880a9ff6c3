//! Interaction state machine
//!
//! - `player`: the mounted player tying playback, subtitles and UI together
//! - `ui_state`: UI-only flags and their transitions
//! - `timer`: cancellable one-shot timers for auto-hide and icon flash
//! - `input`, `shortcuts`: pointer and keyboard vocabulary, window key routing
//! - `autoplay`, `fullscreen`: host-driven visibility and fullscreen seams

pub mod autoplay;
pub mod fullscreen;
pub mod input;
pub mod player;
pub mod shortcuts;
pub mod timer;
pub mod ui_state;
