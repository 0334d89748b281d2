//! Dot-path parsing.

use crate::JsonPathError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member lookup.
    Key(String),
    /// Array element lookup.
    Index(usize),
}

/// A parsed dot-separated path into a JSON document.
///
/// Parsing happens once, at rule load time; dispatch never re-parses
/// path strings. Serializes as the original dotted string so rule
/// files stay human-editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// The parsed segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl FromStr for JsonPath {
    type Err = JsonPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(JsonPathError::Empty);
        }
        let mut segments = Vec::new();
        for (position, raw) in s.split('.').enumerate() {
            if raw.is_empty() {
                return Err(JsonPathError::EmptySegment(position));
            }
            // Digit-only segments address array indices.
            let segment = match raw.parse::<usize>() {
                Ok(index) if raw.bytes().all(|b| b.is_ascii_digit()) => Segment::Index(index),
                _ => Segment::Key(raw.to_string()),
            };
            segments.push(segment);
        }
        Ok(Self { segments })
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                Segment::Key(key) => write!(f, "{key}")?,
                Segment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

impl Serialize for JsonPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        let path: JsonPath = "data.tenantSettings.customLogo".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("data".to_string()),
                Segment::Key("tenantSettings".to_string()),
                Segment::Key("customLogo".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_index_segments() {
        let path: JsonPath = "items.0.name".parse().unwrap();
        assert_eq!(path.segments()[1], Segment::Index(0));
        assert_eq!(path.segments()[2], Segment::Key("name".to_string()));
    }

    #[test]
    fn test_single_key() {
        let path: JsonPath = "HelpLinkURL".parse().unwrap();
        assert_eq!(path.segments().len(), 1);
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!("".parse::<JsonPath>(), Err(JsonPathError::Empty)));
    }

    #[test]
    fn test_empty_segment_rejected() {
        assert!(matches!(
            "a..b".parse::<JsonPath>(),
            Err(JsonPathError::EmptySegment(1))
        ));
        assert!(matches!(
            "a.b.".parse::<JsonPath>(),
            Err(JsonPathError::EmptySegment(2))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let raw = "data.items.3.id";
        let path: JsonPath = raw.parse().unwrap();
        assert_eq!(path.to_string(), raw);
    }

    #[test]
    fn test_serde_as_string() {
        let path: JsonPath = "a.b".parse().unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"a.b\"");
        let parsed: JsonPath = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, path);
    }

    #[test]
    fn test_deserialize_invalid_path_fails() {
        assert!(serde_json::from_str::<JsonPath>("\"\"").is_err());
        assert!(serde_json::from_str::<JsonPath>("\"a..b\"").is_err());
    }
}
