//! Seed values for the random source.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Seed used whenever the supplied one is empty or unusable.
pub const DEFAULT_SEED: u64 = 42;

/// A reproducible seed, either numeric or free text.
///
/// Parsing never fails: trimmed text that reads as a `u64` becomes
/// [`Seed::Number`], any other non-empty text becomes [`Seed::Text`], and
/// empty input falls back to [`DEFAULT_SEED`].
///
/// A `Text` holding only a `u64` is the same seed as the matching `Number`:
/// both select the same stream and both serialize to a value that reads
/// back as `Number`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged, from = "RawSeed")]
pub enum Seed {
    Number(u64),
    Text(String),
}

impl Seed {
    /// Returns the numeric value, if this seed names one.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Seed::Number(n) => Some(*n),
            Seed::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Derives a sibling seed, e.g. one per repeated run in a batch.
    pub fn offset(&self, n: u64) -> Seed {
        match self {
            Seed::Number(base) => Seed::Number(base.wrapping_add(n)),
            Seed::Text(text) if n == 0 => Seed::Text(text.clone()),
            Seed::Text(text) => Seed::Text(format!("{}#{}", text, n)),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Number(DEFAULT_SEED)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{}", n),
            Seed::Text(text) => write!(f, "{}", text),
        }
    }
}

impl FromStr for Seed {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Seed::from(s))
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Seed::default();
        }
        match trimmed.parse::<u64>() {
            Ok(n) => Seed::Number(n),
            Err(_) => Seed::Text(trimmed.to_string()),
        }
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Seed::from(s.as_str())
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::Number(n)
    }
}

/// Wire shapes accepted when deserializing a seed.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeed {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl From<RawSeed> for Seed {
    fn from(raw: RawSeed) -> Self {
        match raw {
            RawSeed::Unsigned(n) => Seed::Number(n),
            RawSeed::Signed(n) => Seed::Text(n.to_string()),
            RawSeed::Float(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                Seed::Number(f as u64)
            }
            RawSeed::Float(f) if f.is_finite() => Seed::Text(f.to_string()),
            RawSeed::Float(_) => Seed::default(),
            RawSeed::Text(text) => Seed::from(text.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_and_text() {
        assert_eq!(Seed::from("123"), Seed::Number(123));
        assert_eq!(Seed::from("  7 "), Seed::Number(7));
        assert_eq!(Seed::from("flu-season"), Seed::Text("flu-season".to_string()));
        assert_eq!(Seed::from("-5"), Seed::Text("-5".to_string()));
    }

    #[test]
    fn test_empty_seed_coerces_to_default() {
        assert_eq!(Seed::from(""), Seed::Number(DEFAULT_SEED));
        assert_eq!(Seed::from("   "), Seed::default());
        assert_eq!("".parse::<Seed>().unwrap(), Seed::default());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Seed::Number(8).as_number(), Some(8));
        assert_eq!(Seed::Text("5".to_string()).as_number(), Some(5));
        assert_eq!(Seed::from("measles").as_number(), None);
    }

    #[test]
    fn test_numeric_text_round_trips_to_same_number() {
        let direct = Seed::Text("5".to_string());
        let json = serde_json::to_string(&direct).unwrap();
        let back: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Seed::Number(5));
        assert_eq!(back.as_number(), direct.as_number());
    }

    #[test]
    fn test_offset() {
        assert_eq!(Seed::Number(10).offset(3), Seed::Number(13));
        assert_eq!(Seed::from("abc").offset(0), Seed::from("abc"));
        assert_eq!(Seed::from("abc").offset(2), Seed::Text("abc#2".to_string()));
    }

    #[test]
    fn test_serde_shapes() {
        let n: Seed = serde_json::from_str("99").unwrap();
        assert_eq!(n, Seed::Number(99));

        let t: Seed = serde_json::from_str("\"measles\"").unwrap();
        assert_eq!(t, Seed::Text("measles".to_string()));

        let blank: Seed = serde_json::from_str("\"\"").unwrap();
        assert_eq!(blank, Seed::default());

        let float: Seed = serde_json::from_str("12.0").unwrap();
        assert_eq!(float, Seed::Number(12));

        assert_eq!(serde_json::to_string(&Seed::Number(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&Seed::from("x")).unwrap(), "\"x\"");
    }
}
