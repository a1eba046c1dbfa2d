//! Line commands typed into the terminal front-end.

use client_core::Key;
use shared::domain::{Command, Mode};

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Start,
    Stop,
    Mode(Mode),
    Select(usize),
    Key(Key),
    Command(Command),
    Status,
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  start | stop            start or stop recognition and polling
  mode <gesture|voice|both>
  select <n>              make video n (1-based) active
  key <space|up|down|left|right|n|p>
  cmd <tag>               apply a command tag directly
  status | list | help | quit";

pub fn parse_line(line: &str) -> Result<Input, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty input".to_string());
    };
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments for '{verb}'"));
    }

    match (verb.to_ascii_lowercase().as_str(), arg) {
        ("start", None) => Ok(Input::Start),
        ("stop", None) => Ok(Input::Stop),
        ("status", None) => Ok(Input::Status),
        ("list" | "ls", None) => Ok(Input::List),
        ("help" | "?", None) => Ok(Input::Help),
        ("quit" | "exit", None) => Ok(Input::Quit),
        ("mode", Some(mode)) => mode.parse().map(Input::Mode).map_err(|err| err.to_string()),
        ("select", Some(index)) => match index.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Input::Select(n - 1)),
            _ => Err(format!("'{index}' is not a video number")),
        },
        ("key", Some(name)) => Key::parse(name)
            .map(Input::Key)
            .ok_or_else(|| format!("unknown key '{name}'")),
        ("cmd", Some(tag)) => Ok(Input::Command(Command::parse(tag))),
        (verb, _) => Err(format!("unrecognised input '{verb}'; try 'help'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_verbs() {
        assert_eq!(parse_line("start"), Ok(Input::Start));
        assert_eq!(parse_line("  STOP "), Ok(Input::Stop));
        assert_eq!(parse_line("quit"), Ok(Input::Quit));
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(parse_line("mode both"), Ok(Input::Mode(Mode::Both)));
        assert_eq!(parse_line("select 2"), Ok(Input::Select(1)));
        assert_eq!(parse_line("key space"), Ok(Input::Key(Key::Space)));
        assert_eq!(
            parse_line("cmd fullscreen"),
            Ok(Input::Command(Command::Fullscreen))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_line("").is_err());
        assert!(parse_line("select 0").is_err());
        assert!(parse_line("mode hands").is_err());
        assert!(parse_line("start now").is_err());
        assert!(parse_line("dance").is_err());
    }
}
