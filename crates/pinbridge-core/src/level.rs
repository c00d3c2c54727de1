//! Logic levels and edge kinds shared by the local and remote drivers.

use core::fmt;

use crate::error::{Error, Result};

/// Logic level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Line driven or read as 0.
    #[default]
    Low,
    /// Line driven or read as 1.
    High,
}

impl Level {
    /// Returns the level as the bit value `0` or `1`.
    pub const fn as_bit(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }

    /// Wire token understood by the Arduino sketch.
    pub const fn token(self) -> &'static str {
        match self {
            Level::Low => "LOW",
            Level::High => "HIGH",
        }
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value { Level::High } else { Level::Low }
    }
}

impl From<Level> for bool {
    fn from(value: Level) -> Self {
        matches!(value, Level::High)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Values accepted wherever a caller writes a digital level.
///
/// Integers `0`/`1`, the strings `"0"`/`"1"` and `"LOW"`/`"HIGH"` (any case),
/// `bool` and [`Level`] itself are accepted. Anything else is an
/// [`Error::InvalidArgument`].
pub trait IntoLevel {
    /// Normalizes `self` into a [`Level`].
    fn into_level(self) -> Result<Level>;
}

impl IntoLevel for Level {
    fn into_level(self) -> Result<Level> {
        Ok(self)
    }
}

impl IntoLevel for bool {
    fn into_level(self) -> Result<Level> {
        Ok(Level::from(self))
    }
}

macro_rules! int_into_level {
    ($($t:ty),*) => {
        $(
            impl IntoLevel for $t {
                fn into_level(self) -> Result<Level> {
                    match self {
                        0 => Ok(Level::Low),
                        1 => Ok(Level::High),
                        other => Err(Error::invalid(format!("level must be 0 or 1, got {other}"))),
                    }
                }
            }
        )*
    };
}

int_into_level!(u8, u16, u32, i32, i64);

impl IntoLevel for &str {
    fn into_level(self) -> Result<Level> {
        let token = self.trim();
        if token == "0" || token.eq_ignore_ascii_case("low") {
            Ok(Level::Low)
        } else if token == "1" || token.eq_ignore_ascii_case("high") {
            Ok(Level::High)
        } else {
            Err(Error::invalid(format!("level must be \"0\" or \"1\", got {self:?}")))
        }
    }
}

impl IntoLevel for &String {
    fn into_level(self) -> Result<Level> {
        self.as_str().into_level()
    }
}

impl IntoLevel for String {
    fn into_level(self) -> Result<Level> {
        self.as_str().into_level()
    }
}

/// Direction of a level transition to watch for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
    /// Either direction.
    Both,
}

impl Edge {
    /// Parses an edge-watch mode.
    ///
    /// Recognizes `rising`, `falling` and `both`, along with the older
    /// `up`, `down` and `all` spellings. Unknown modes yield `None`; callers
    /// treat that as "ignore the request", never as an error.
    pub fn from_mode(mode: &str) -> Option<Edge> {
        match mode {
            "rising" | "up" => Some(Edge::Rising),
            "falling" | "down" => Some(Edge::Falling),
            "both" | "all" => Some(Edge::Both),
            _ => None,
        }
    }
}
