use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A command tag as produced by the recognition service.
///
/// Tags outside the known set are kept verbatim in [`Command::Unknown`] so they
/// can be logged; they never change player state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Command {
    PlayPause,
    VolumeUp,
    VolumeDown,
    SkipForward,
    SkipBackward,
    NextVideo,
    PreviousVideo,
    Fullscreen,
    Unknown(String),
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::PlayPause,
        Command::VolumeUp,
        Command::VolumeDown,
        Command::SkipForward,
        Command::SkipBackward,
        Command::NextVideo,
        Command::PreviousVideo,
        Command::Fullscreen,
    ];

    pub fn parse(tag: &str) -> Self {
        match tag {
            "play_pause" => Self::PlayPause,
            "volume_up" => Self::VolumeUp,
            "volume_down" => Self::VolumeDown,
            "skip_forward" => Self::SkipForward,
            "skip_backward" => Self::SkipBackward,
            "next_video" => Self::NextVideo,
            "previous_video" => Self::PreviousVideo,
            "fullscreen" => Self::Fullscreen,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PlayPause => "play_pause",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::SkipForward => "skip_forward",
            Self::SkipBackward => "skip_backward",
            Self::NextVideo => "next_video",
            Self::PreviousVideo => "previous_video",
            Self::Fullscreen => "fullscreen",
            Self::Unknown(tag) => tag,
        }
    }

    /// Navigation commands are the only ones that work without an active target.
    pub fn requires_active_target(&self) -> bool {
        !matches!(self, Self::NextVideo | Self::PreviousVideo)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for Command {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Command> for String {
    fn from(value: Command) -> Self {
        match value {
            Command::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which recognisers feed the command queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Gesture,
    Voice,
    Both,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Gesture, Mode::Voice, Mode::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gesture => "gesture",
            Self::Voice => "voice",
            Self::Both => "both",
        }
    }

    pub fn accepts(self, source: CommandSource) -> bool {
        match (self, source) {
            (Self::Both, _) => true,
            (Self::Gesture, CommandSource::Gesture) => true,
            (Self::Voice, CommandSource::Voice) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{0}': expected gesture, voice or both")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gesture" => Ok(Self::Gesture),
            "voice" => Ok(Self::Voice),
            "both" => Ok(Self::Both),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// The recogniser a queued command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    Gesture,
    Voice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}
