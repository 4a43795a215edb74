//! ROLFP impact vectors.
//!
//! An asset's ROLFP vector grades the impact of a compromise along five
//! binary dimensions (Reputation, Operation, Legal, Financial, Personal) plus
//! a Scope in `0..=2`. The canonical text form is
//! `R:<r>/O:<o>/L:<l>/F:<f>/P:<p>+S:<s>`; the empty vector is `""`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::VulcanError;

/// Highest value of the five binary dimensions.
const MAX_BINARY: u8 = 1;
/// Highest value of the scope dimension.
const MAX_SCOPE: u8 = 2;

/// The six dimensions of a non-empty vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RolfpVector {
    pub reputation: u8,
    pub operation: u8,
    pub legal: u8,
    pub financial: u8,
    pub personal: u8,
    pub scope: u8,
}

impl RolfpVector {
    /// Build a vector, checking every dimension is within range.
    pub fn new(
        reputation: u8,
        operation: u8,
        legal: u8,
        financial: u8,
        personal: u8,
        scope: u8,
    ) -> Result<Self, VulcanError> {
        for (name, value) in [
            ("R", reputation),
            ("O", operation),
            ("L", legal),
            ("F", financial),
            ("P", personal),
        ] {
            if value > MAX_BINARY {
                return Err(VulcanError::validation(
                    "rolfp",
                    format!("{name} must be 0 or 1, got {value}"),
                ));
            }
        }
        if scope > MAX_SCOPE {
            return Err(VulcanError::validation(
                "rolfp",
                format!("S must be between 0 and 2, got {scope}"),
            ));
        }
        Ok(Self {
            reputation,
            operation,
            legal,
            financial,
            personal,
            scope,
        })
    }

    fn binary_sum(&self) -> u8 {
        self.reputation + self.operation + self.legal + self.financial + self.personal
    }
}

/// An impact vector, or the explicit empty marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rolfp {
    #[default]
    Empty,
    Vector(RolfpVector),
}

impl Rolfp {
    /// The vector the remote API assigns when none is supplied.
    pub const DEFAULT_VECTOR: RolfpVector = RolfpVector {
        reputation: 1,
        operation: 1,
        legal: 1,
        financial: 1,
        personal: 1,
        scope: 2,
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Rolfp::Empty)
    }

    /// Derived criticality level in `0..=2`.
    ///
    /// Empty or full scope is always level 2; otherwise the level follows the
    /// number of impacted binary dimensions (0 → 0, 1..=2 → 1, more → 2).
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            Rolfp::Empty => 2,
            Rolfp::Vector(v) if v.scope == MAX_SCOPE => 2,
            Rolfp::Vector(v) => match v.binary_sum() {
                0 => 0,
                1 | 2 => 1,
                _ => 2,
            },
        }
    }
}

impl Display for Rolfp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rolfp::Empty => Ok(()),
            Rolfp::Vector(v) => write!(
                f,
                "R:{}/O:{}/L:{}/F:{}/P:{}+S:{}",
                v.reputation, v.operation, v.legal, v.financial, v.personal, v.scope
            ),
        }
    }
}

impl FromStr for Rolfp {
    type Err = VulcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Rolfp::Empty);
        }

        let invalid = || {
            VulcanError::validation(
                "rolfp",
                format!("'{s}' does not match R:<r>/O:<o>/L:<l>/F:<f>/P:<p>+S:<s>"),
            )
        };

        let (dimensions, scope) = s.split_once('+').ok_or_else(invalid)?;
        let parts: Vec<&str> = dimensions.split('/').collect();
        if parts.len() != 5 {
            return Err(invalid());
        }

        let mut values = [0u8; 5];
        for ((part, expected), slot) in parts.iter().zip(["R", "O", "L", "F", "P"]).zip(&mut values) {
            *slot = parse_dimension(part, expected).ok_or_else(invalid)?;
        }
        let scope = parse_dimension(scope, "S").ok_or_else(invalid)?;

        RolfpVector::new(values[0], values[1], values[2], values[3], values[4], scope)
            .map(Rolfp::Vector)
    }
}

fn parse_dimension(part: &str, expected: &str) -> Option<u8> {
    let (name, value) = part.split_once(':')?;
    if name != expected {
        return None;
    }
    value.parse().ok()
}

impl Serialize for Rolfp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rolfp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
