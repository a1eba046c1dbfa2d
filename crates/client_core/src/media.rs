use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, Result};

/// A playable element owned by the surrounding page.
///
/// The controller only ever holds shared handles, so every operation takes
/// `&self` and implementations provide their own interior mutability.
pub trait MediaTarget: Send + Sync {
    /// Human readable identifier, typically the media source.
    fn label(&self) -> String;
    fn is_paused(&self) -> bool;
    fn play(&self) -> Result<()>;
    fn pause(&self);
    fn volume(&self) -> f64;
    fn set_volume(&self, volume: f64);
    /// Playback position in seconds.
    fn position(&self) -> f64;
    /// Seeks to `seconds`. Implementations clamp to their own bounds.
    fn set_position(&self, seconds: f64);
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&self) -> Result<()>;
    fn exit_fullscreen(&self);
    fn is_highlighted(&self) -> bool;
    fn set_highlighted(&self, highlighted: bool);
}

#[derive(Debug, Clone)]
struct VideoState {
    paused: bool,
    volume: f64,
    position: f64,
    fullscreen: bool,
    highlighted: bool,
}

/// In-memory video element with HTML media clamping rules: volume stays in
/// `[0, 1]` and seeking is clamped to `[0, duration]`.
#[derive(Debug)]
pub struct SimulatedVideo {
    label: String,
    duration: f64,
    fullscreen_allowed: bool,
    state: Mutex<VideoState>,
}

impl SimulatedVideo {
    pub fn new(label: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            label: label.into(),
            duration: duration_secs.max(0.0),
            fullscreen_allowed: true,
            state: Mutex::new(VideoState {
                paused: true,
                volume: 1.0,
                position: 0.0,
                fullscreen: false,
                highlighted: false,
            }),
        }
    }

    pub fn with_volume(self, volume: f64) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn with_position(self, seconds: f64) -> Self {
        self.set_position(seconds);
        self
    }

    /// Makes every fullscreen request fail, like a page without user activation.
    pub fn deny_fullscreen(mut self) -> Self {
        self.fullscreen_allowed = false;
        self
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    fn state(&self) -> MutexGuard<'_, VideoState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaTarget for SimulatedVideo {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn play(&self) -> Result<()> {
        self.state().paused = false;
        Ok(())
    }

    fn pause(&self) {
        self.state().paused = true;
    }

    fn volume(&self) -> f64 {
        self.state().volume
    }

    fn set_volume(&self, volume: f64) {
        self.state().volume = volume.clamp(0.0, 1.0);
    }

    fn position(&self) -> f64 {
        self.state().position
    }

    fn set_position(&self, seconds: f64) {
        self.state().position = seconds.clamp(0.0, self.duration);
    }

    fn is_fullscreen(&self) -> bool {
        self.state().fullscreen
    }

    fn request_fullscreen(&self) -> Result<()> {
        if !self.fullscreen_allowed {
            return Err(anyhow!("fullscreen request denied for {}", self.label));
        }
        self.state().fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&self) {
        self.state().fullscreen = false;
    }

    fn is_highlighted(&self) -> bool {
        self.state().highlighted
    }

    fn set_highlighted(&self, highlighted: bool) {
        self.state().highlighted = highlighted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeking_is_clamped_to_duration() {
        let video = SimulatedVideo::new("clip.mp4", 30.0).with_position(25.0);
        video.set_position(video.position() + 10.0);
        assert_eq!(video.position(), 30.0);
        video.set_position(-4.0);
        assert_eq!(video.position(), 0.0);
    }

    #[test]
    fn starts_paused_at_full_volume() {
        let video = SimulatedVideo::new("clip.mp4", 30.0);
        assert!(video.is_paused());
        assert_eq!(video.volume(), 1.0);
        assert!(!video.is_fullscreen());
    }

    #[test]
    fn denied_fullscreen_leaves_state_untouched() {
        let video = SimulatedVideo::new("clip.mp4", 30.0).deny_fullscreen();
        assert!(video.request_fullscreen().is_err());
        assert!(!video.is_fullscreen());
    }
}
