//! World map coordinates.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when reading [`Coordinates`] from a home-base pair.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatesError {
    /// The home-base field does not hold two entries.
    #[error("home base must have 2 entries, found {0}")]
    WrongLength(usize),
    /// An entry is not a decimal integer.
    #[error("home base {axis} coordinate is not a number: {value:?}")]
    NotANumber {
        /// Which axis failed (`x` or `y`).
        axis: &'static str,
        /// The offending raw value.
        value: String,
    },
}

/// A cell position on a world map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coordinates {
    /// Create coordinates from a column and row.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Parse the serialized two-element home-base field (`["x", "y"]`).
    ///
    /// # Errors
    ///
    /// Returns an error if the slice does not hold exactly two entries or if
    /// either entry is not a decimal integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use outpost_core::Coordinates;
    ///
    /// let home = vec!["12".to_string(), "40".to_string()];
    /// assert_eq!(Coordinates::from_homebase(&home).unwrap(), Coordinates::new(12, 40));
    /// assert!(Coordinates::from_homebase(&[]).is_err());
    /// ```
    pub fn from_homebase(homebase: &[String]) -> Result<Self, CoordinatesError> {
        let [x, y] = homebase else {
            return Err(CoordinatesError::WrongLength(homebase.len()));
        };

        Ok(Self {
            x: parse_axis("x", x)?,
            y: parse_axis("y", y)?,
        })
    }

    /// Serialize back into the home-base pair format.
    #[must_use]
    pub fn to_homebase(self) -> Vec<String> {
        vec![self.x.to_string(), self.y.to_string()]
    }
}

fn parse_axis(axis: &'static str, value: &str) -> Result<i32, CoordinatesError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| CoordinatesError::NotANumber {
            axis,
            value: value.to_owned(),
        })
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
