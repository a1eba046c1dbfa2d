use shared::domain::{Command, Direction};
use tracing::{error, info, warn};

use crate::{feedback::FeedbackPresenter, registry::TargetRegistry};

pub const DEFAULT_VOLUME_STEP: f64 = 0.1;
pub const DEFAULT_SKIP_SECONDS: f64 = 10.0;

/// Applies one command to the registry's active target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandExecutor {
    volume_step: f64,
    skip_seconds: f64,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME_STEP, DEFAULT_SKIP_SECONDS)
    }
}

impl CommandExecutor {
    pub fn new(volume_step: f64, skip_seconds: f64) -> Self {
        Self {
            volume_step,
            skip_seconds,
        }
    }

    /// Returns the feedback text that was shown, if any.
    ///
    /// Unknown tags and target-bound commands without an active target are
    /// logged and otherwise ignored.
    pub fn apply(
        &self,
        command: &Command,
        registry: &mut TargetRegistry,
        presenter: &FeedbackPresenter,
    ) -> Option<String> {
        if command.requires_active_target() && registry.active().is_none() {
            warn!(command = %command, "no active video player selected");
            return None;
        }

        info!(command = %command, "executing command");

        let text = match command {
            Command::PlayPause => {
                let target = registry.active()?;
                if target.is_paused() {
                    if let Err(err) = target.play() {
                        error!(target_label = %target.label(), %err, "play request failed");
                    }
                    "Play".to_string()
                } else {
                    target.pause();
                    "Pause".to_string()
                }
            }
            Command::VolumeUp => {
                let target = registry.active()?;
                target.set_volume((target.volume() + self.volume_step).min(1.0));
                volume_text(target.volume())
            }
            Command::VolumeDown => {
                let target = registry.active()?;
                target.set_volume((target.volume() - self.volume_step).max(0.0));
                volume_text(target.volume())
            }
            Command::SkipForward => {
                let target = registry.active()?;
                target.set_position(target.position() + self.skip_seconds);
                format!("Forward {}s", self.skip_seconds)
            }
            Command::SkipBackward => {
                let target = registry.active()?;
                target.set_position(target.position() - self.skip_seconds);
                format!("Back {}s", self.skip_seconds)
            }
            Command::NextVideo => {
                registry.switch_active(Direction::Next, presenter);
                "Next Video".to_string()
            }
            Command::PreviousVideo => {
                registry.switch_active(Direction::Previous, presenter);
                "Previous Video".to_string()
            }
            Command::Fullscreen => {
                let fullscreen: Vec<_> = registry
                    .targets()
                    .iter()
                    .filter(|target| target.is_fullscreen())
                    .collect();
                if fullscreen.is_empty() {
                    let target = registry.active()?;
                    if let Err(err) = target.request_fullscreen() {
                        error!(target_label = %target.label(), %err, "error attempting to enable fullscreen");
                    }
                } else {
                    for target in fullscreen {
                        target.exit_fullscreen();
                    }
                }
                "Fullscreen Toggle".to_string()
            }
            Command::Unknown(tag) => {
                warn!(command = %tag, "unknown command");
                return None;
            }
        };

        let target = registry.active()?;
        presenter.command_feedback(target.as_ref(), &text);
        Some(text)
    }
}

fn volume_text(volume: f64) -> String {
    format!("Volume: {}%", (volume * 100.0).round() as i64)
}

#[cfg(test)]
#[path = "tests/executor_tests.rs"]
mod tests;
