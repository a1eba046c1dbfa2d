//! Keyboard shortcuts for driving the players by hand while a session is active.

use shared::domain::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Char(char),
}

impl Key {
    /// Parses key names as typed in the terminal front-end: `space`, `up`,
    /// `down`, `left`, `right`, or a single character.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            " " | "space" => Some(Self::Space),
            "up" | "ArrowUp" => Some(Self::ArrowUp),
            "down" | "ArrowDown" => Some(Self::ArrowDown),
            "left" | "ArrowLeft" => Some(Self::ArrowLeft),
            "right" | "ArrowRight" => Some(Self::ArrowRight),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Self::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

pub fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::Space | Key::Char(' ') => Some(Command::PlayPause),
        Key::ArrowUp => Some(Command::VolumeUp),
        Key::ArrowDown => Some(Command::VolumeDown),
        Key::ArrowRight => Some(Command::SkipForward),
        Key::ArrowLeft => Some(Command::SkipBackward),
        Key::Char('n') => Some(Command::NextVideo),
        Key::Char('p') => Some(Command::PreviousVideo),
        Key::Char(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_documented_shortcuts() {
        let cases = [
            ("space", Command::PlayPause),
            ("up", Command::VolumeUp),
            ("down", Command::VolumeDown),
            ("right", Command::SkipForward),
            ("left", Command::SkipBackward),
            ("n", Command::NextVideo),
            ("p", Command::PreviousVideo),
        ];
        for (name, expected) in cases {
            let key = Key::parse(name).expect("key");
            assert_eq!(command_for_key(key), Some(expected), "{name}");
        }
    }

    #[test]
    fn shortcuts_are_case_sensitive_and_fullscreen_has_none() {
        assert_eq!(command_for_key(Key::Char('N')), None);
        assert_eq!(command_for_key(Key::Char('f')), None);
        assert_eq!(Key::parse("enter"), None);
    }
}
