use std::fmt;
use std::str::FromStr;

use compact_str::CompactString;

use crate::display::DisplayId;
use crate::error::NotchError;
use crate::geometry::Point;
use crate::triggers::{ScrollEvent, ScrollPhase};

/// Commands accepted over IPC, one per line
#[derive(Debug, Clone, PartialEq)]
pub enum NotchCommand {
    // =========== Transitions ===========
    Open,
    Close,
    PeekIn,
    PeekOut,

    // =========== Input ===========
    /// Click on the panel
    Click,
    /// File dropped onto the panel
    Drop,
    Scroll(ScrollEvent),
    Pointer(Point),

    // =========== Signals & gates ===========
    /// Now-playing artwork presence
    Artwork(bool),
    SettingsWindow(bool),
    Shortcut {
        name: CompactString,
        active: bool,
    },

    // =========== Daemon ===========
    /// Select the display hosting the panel
    Display(DisplayId),
    ReloadConfig,
    Status,
}

impl NotchCommand {
    /// Parse one IPC line
    pub fn parse(line: &str) -> Result<Self, NotchError> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(NotchError::invalid_command("empty command"));
        };
        let args: Vec<&str> = parts.collect();

        let command = match (verb.to_lowercase().as_str(), args.as_slice()) {
            ("open", []) => Self::Open,
            ("close", []) => Self::Close,
            ("peek-in", []) => Self::PeekIn,
            ("peek-out", []) => Self::PeekOut,
            ("click", []) => Self::Click,
            ("drop", []) => Self::Drop,
            ("scroll", [delta, phase]) => Self::Scroll(ScrollEvent::new(
                parse_number(delta)?,
                phase.parse::<ScrollPhase>()?,
            )),
            ("pointer", [x, y]) => Self::Pointer(Point::new(parse_number(x)?, parse_number(y)?)),
            ("artwork", [flag]) => Self::Artwork(parse_flag(flag, "on", "off")?),
            ("settings-window", [flag]) => Self::SettingsWindow(parse_flag(flag, "open", "closed")?),
            ("shortcut", [name @ .., flag]) if !name.is_empty() => Self::Shortcut {
                name: name.join(" ").into(),
                active: parse_flag(flag, "on", "off")?,
            },
            ("display", [id]) => Self::Display(DisplayId(id.parse().map_err(|_| {
                NotchError::invalid_command(format!("invalid display id: {}", id))
            })?)),
            ("reload-config", []) => Self::ReloadConfig,
            ("status", []) => Self::Status,
            (verb, _) => {
                return Err(NotchError::invalid_command(format!(
                    "unknown command or wrong arguments: {}",
                    verb
                )))
            }
        };
        Ok(command)
    }
}

impl FromStr for NotchCommand {
    type Err = NotchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NotchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Close => f.write_str("close"),
            Self::PeekIn => f.write_str("peek-in"),
            Self::PeekOut => f.write_str("peek-out"),
            Self::Click => f.write_str("click"),
            Self::Drop => f.write_str("drop"),
            Self::Scroll(event) => write!(f, "scroll {} {:?}", event.delta, event.phase),
            Self::Pointer(point) => write!(f, "pointer {} {}", point.x, point.y),
            Self::Artwork(on) => write!(f, "artwork {}", if *on { "on" } else { "off" }),
            Self::SettingsWindow(open) => {
                write!(f, "settings-window {}", if *open { "open" } else { "closed" })
            }
            Self::Shortcut { name, active } => {
                write!(f, "shortcut {} {}", name, if *active { "on" } else { "off" })
            }
            Self::Display(id) => write!(f, "display {}", id),
            Self::ReloadConfig => f.write_str("reload-config"),
            Self::Status => f.write_str("status"),
        }
    }
}

fn parse_number(s: &str) -> Result<f64, NotchError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| NotchError::invalid_command(format!("invalid number: {}", s)))
}

fn parse_flag(s: &str, yes: &str, no: &str) -> Result<bool, NotchError> {
    match s.to_lowercase().as_str() {
        v if v == yes || v == "true" || v == "1" => Ok(true),
        v if v == no || v == "false" || v == "0" => Ok(false),
        _ => Err(NotchError::invalid_command(format!(
            "expected {} or {}, got {}",
            yes, no, s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_verbs() {
        assert_eq!(NotchCommand::parse("open").unwrap(), NotchCommand::Open);
        assert_eq!(NotchCommand::parse("  Peek-Out \n").unwrap(), NotchCommand::PeekOut);
        assert_eq!(NotchCommand::parse("reload-config").unwrap(), NotchCommand::ReloadConfig);
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            NotchCommand::parse("scroll 260 began").unwrap(),
            NotchCommand::Scroll(ScrollEvent::new(260.0, ScrollPhase::Began))
        );
        assert_eq!(
            NotchCommand::parse("pointer 1512 40.5").unwrap(),
            NotchCommand::Pointer(Point::new(1512.0, 40.5))
        );
        assert_eq!(
            NotchCommand::parse("settings-window open").unwrap(),
            NotchCommand::SettingsWindow(true)
        );
        assert_eq!(
            NotchCommand::parse("display 2").unwrap(),
            NotchCommand::Display(DisplayId(2))
        );
    }

    #[test]
    fn shortcut_names_may_contain_spaces() {
        assert_eq!(
            NotchCommand::parse("shortcut Hover Hide on").unwrap(),
            NotchCommand::Shortcut {
                name: "Hover Hide".into(),
                active: true
            }
        );
    }

    #[test]
    fn rejects_garbage() {
        for line in ["", "fly", "open now", "scroll x began", "pointer 1", "artwork maybe", "shortcut on"] {
            assert!(NotchCommand::parse(line).is_err(), "{:?} should fail", line);
        }
    }

    #[test]
    fn display_form_parses_back() {
        for command in [
            NotchCommand::PeekIn,
            NotchCommand::Artwork(false),
            NotchCommand::Shortcut {
                name: "Hover Hide".into(),
                active: false,
            },
        ] {
            assert_eq!(NotchCommand::parse(&command.to_string()).unwrap(), command);
        }
    }
}
