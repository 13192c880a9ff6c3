//! Fullscreen host seam

use crate::error::Result;

/// The container element the player lives in.
///
/// Requests may fail or be ignored by the host. Whatever happens, the host
/// reports the real outcome back through `Player::on_fullscreen_change`.
pub trait FullscreenTarget: Send + Sync + 'static {
    fn request_fullscreen(&self) -> Result<()>;

    fn exit_fullscreen(&self) -> Result<()>;
}

/// Host without fullscreen support; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFullscreen;

impl FullscreenTarget for NoFullscreen {
    fn request_fullscreen(&self) -> Result<()> {
        Err(crate::PlayerError::Fullscreen(
            "fullscreen is not supported by this host".to_string(),
        ))
    }

    fn exit_fullscreen(&self) -> Result<()> {
        Ok(())
    }
}
