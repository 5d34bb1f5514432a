//! Line protocol spoken over the daemon's control socket. One command per
//! line: `begin`, `drag <dx>` or `end <dx>`.

use crate::gesture::{GesturePhase, GestureSample};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/wheel.sock";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Begin,
    Drag(f64),
    End(f64),
}

#[derive(Error, Debug, PartialEq)]
pub enum ProtocolError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs a horizontal delta")]
    MissingDelta(String),
    #[error("Invalid delta '{0}'")]
    InvalidDelta(String),
    #[error("Unexpected argument '{0}'")]
    TrailingArgument(String),
}

impl Command {
    pub fn into_sample(self) -> GestureSample {
        match self {
            Self::Begin => GestureSample::new(GesturePhase::Began, 0.0),
            Self::Drag(dx) => GestureSample::new(GesturePhase::Active, dx),
            Self::End(dx) => GestureSample::new(GesturePhase::Ended, dx),
        }
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(ProtocolError::Empty)?;

        let mut delta = || -> Result<f64, ProtocolError> {
            let raw = words
                .next()
                .ok_or_else(|| ProtocolError::MissingDelta(name.to_string()))?;
            raw.parse::<f64>()
                .ok()
                .filter(|dx| dx.is_finite())
                .ok_or_else(|| ProtocolError::InvalidDelta(raw.to_string()))
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "begin" => Self::Begin,
            "drag" => Self::Drag(delta()?),
            "end" => Self::End(delta()?),
            _ => return Err(ProtocolError::Unknown(name.to_string())),
        };

        match words.next() {
            Some(extra) => Err(ProtocolError::TrailingArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin => write!(f, "begin"),
            Self::Drag(dx) => write!(f, "drag {}", dx),
            Self::End(dx) => write!(f, "end {}", dx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("begin", Command::Begin),
            ("  BEGIN ", Command::Begin),
            ("drag 40", Command::Drag(40.0)),
            ("drag -12.5", Command::Drag(-12.5)),
            ("End 3", Command::End(3.0)),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>(), Ok(expected), "{line}");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ProtocolError::Empty));
        assert_eq!(
            "spin 4".parse::<Command>(),
            Err(ProtocolError::Unknown("spin".into()))
        );
        assert_eq!(
            "drag".parse::<Command>(),
            Err(ProtocolError::MissingDelta("drag".into()))
        );
        assert_eq!(
            "end fast".parse::<Command>(),
            Err(ProtocolError::InvalidDelta("fast".into()))
        );
        assert_eq!(
            "end inf".parse::<Command>(),
            Err(ProtocolError::InvalidDelta("inf".into()))
        );
        assert_eq!(
            "begin now".parse::<Command>(),
            Err(ProtocolError::TrailingArgument("now".into()))
        );
    }

    #[test]
    fn test_display_parses_back() {
        for command in [Command::Begin, Command::Drag(-7.25), Command::End(90.0)] {
            assert_eq!(command.to_string().parse::<Command>(), Ok(command));
        }
    }

    #[test]
    fn test_into_sample() {
        assert_eq!(
            Command::End(12.0).into_sample(),
            GestureSample::new(GesturePhase::Ended, 12.0)
        );
    }
}
