//! Grid Coordinates
//!
//! The server encodes cell positions as strings: door keys use `"x,y"`,
//! fire entries use `"x y"`. Both decode to a [`GridCoord`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the two integers of a door key.
pub const DOOR_KEY_SEPARATOR: char = ',';

/// Separator between the two integers of a fire position.
pub const FIRE_POSITION_SEPARATOR: char = ' ';

/// An integer cell address. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    /// Creates a new coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Parses `input` as exactly two integers separated by `separator`.
    ///
    /// Tokens may carry surrounding whitespace when the separator is not
    /// whitespace itself, so `"3, 4"` is a valid door key but `"1  2"` is not
    /// a valid fire position.
    pub fn parse_with(input: &str, separator: char) -> Result<Self, ParseCoordError> {
        let tokens: Vec<&str> = input.split(separator).collect();
        if tokens.len() != 2 {
            return Err(ParseCoordError::WrongTokenCount {
                input: input.to_string(),
                separator,
                found: tokens.len(),
            });
        }

        let x = parse_component(input, tokens[0])?;
        let y = parse_component(input, tokens[1])?;
        Ok(Self { x, y })
    }
}

fn parse_component(input: &str, token: &str) -> Result<i32, ParseCoordError> {
    token
        .trim()
        .parse::<i32>()
        .map_err(|_| ParseCoordError::InvalidInteger {
            input: input.to_string(),
            token: token.to_string(),
        })
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses a door key such as `"3,4"`.
pub fn parse_door_key(key: &str) -> Result<GridCoord, ParseCoordError> {
    GridCoord::parse_with(key, DOOR_KEY_SEPARATOR)
}

/// Parses a fire position such as `"1 2"`.
pub fn parse_fire_position(entry: &str) -> Result<GridCoord, ParseCoordError> {
    GridCoord::parse_with(entry, FIRE_POSITION_SEPARATOR)
}

impl FromStr for GridCoord {
    type Err = ParseCoordError;

    /// Parses the door-key form `"x,y"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_door_key(s)
    }
}

/// Error type for parsing coordinates from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCoordError {
    WrongTokenCount {
        input: String,
        separator: char,
        found: usize,
    },
    InvalidInteger {
        input: String,
        token: String,
    },
}

impl ParseCoordError {
    /// The full string that failed to parse.
    pub fn input(&self) -> &str {
        match self {
            ParseCoordError::WrongTokenCount { input, .. } => input,
            ParseCoordError::InvalidInteger { input, .. } => input,
        }
    }
}

impl fmt::Display for ParseCoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCoordError::WrongTokenCount {
                input,
                separator,
                found,
            } => write!(
                f,
                "invalid coordinate '{}': expected 2 values separated by {:?}, found {}",
                input, separator, found
            ),
            ParseCoordError::InvalidInteger { input, token } => {
                write!(f, "invalid coordinate '{}': '{}' is not an integer", input, token)
            }
        }
    }
}

impl std::error::Error for ParseCoordError {}
