//! Categorical encoding for the location feature
//!
//! A location's code is its position in the class list, matching the
//! label encoder the regressor was fitted with.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Class used for locations the regressor never saw during training
pub const FALLBACK_LOCATION: &str = "other";

/// Code used when even the fallback class is unmapped
pub const DEFAULT_LOCATION_CODE: u32 = 0;

/// On-disk shape of the encoder artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncoderData {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "EncoderData", into = "EncoderData")]
pub struct LocationEncoder {
    classes: Vec<String>,
    codes: AHashMap<String, u32>,
}

/// How a location string was turned into a code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationResolution {
    /// The location is a known class
    Known(u32),
    /// Unknown location, mapped to the fallback class
    Fallback(u32),
    /// Unknown location and no fallback class; uses [`DEFAULT_LOCATION_CODE`]
    Unmapped,
}

impl LocationResolution {
    #[inline]
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            LocationResolution::Known(code) | LocationResolution::Fallback(code) => *code,
            LocationResolution::Unmapped => DEFAULT_LOCATION_CODE,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        !matches!(self, LocationResolution::Known(_))
    }
}

impl LocationEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(Error::InvalidEncoder("encoder has no classes".to_string()));
        }
        if classes.len() > u32::MAX as usize {
            return Err(Error::InvalidEncoder(format!(
                "too many classes: {}",
                classes.len()
            )));
        }

        let mut codes = AHashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code as u32).is_some() {
                return Err(Error::InvalidEncoder(format!("duplicate class '{}'", class)));
            }
        }

        Ok(Self { classes, codes })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Known classes in code order
    #[inline]
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Known classes in lexical order, for select inputs
    #[must_use]
    pub fn sorted_classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
        classes.sort_unstable();
        classes
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, location: &str) -> bool {
        self.codes.contains_key(location)
    }

    /// Code of a known class; `None` for anything else
    #[inline]
    #[must_use]
    pub fn encode(&self, location: &str) -> Option<u32> {
        self.codes.get(location).copied()
    }

    /// Resolve any location string to a code, falling back for unknown input
    #[must_use]
    pub fn resolve(&self, location: &str) -> LocationResolution {
        if let Some(code) = self.encode(location) {
            return LocationResolution::Known(code);
        }
        match self.encode(FALLBACK_LOCATION) {
            Some(code) => LocationResolution::Fallback(code),
            None => LocationResolution::Unmapped,
        }
    }
}

impl TryFrom<EncoderData> for LocationEncoder {
    type Error = Error;

    fn try_from(data: EncoderData) -> Result<Self> {
        Self::new(data.classes)
    }
}

impl From<LocationEncoder> for EncoderData {
    fn from(encoder: LocationEncoder) -> Self {
        EncoderData { classes: encoder.classes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder(classes: &[&str]) -> LocationEncoder {
        LocationEncoder::new(classes.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_codes_follow_class_order() {
        let enc = encoder(&["Hebbal", "Whitefield", "other"]);
        assert_eq!(enc.encode("Hebbal"), Some(0));
        assert_eq!(enc.encode("Whitefield"), Some(1));
        assert_eq!(enc.encode("other"), Some(2));
        assert_eq!(enc.encode("Nowhere"), None);
    }

    #[test]
    fn test_resolve_known() {
        let enc = encoder(&["Hebbal", "Whitefield", "other"]);
        let r = enc.resolve("Whitefield");
        assert_eq!(r, LocationResolution::Known(1));
        assert!(!r.is_fallback());
    }

    #[test]
    fn test_resolve_unknown_uses_other() {
        let enc = encoder(&["Hebbal", "Whitefield", "other"]);
        let r = enc.resolve("NotARealPlace");
        assert_eq!(r, LocationResolution::Fallback(2));
        assert!(r.is_fallback());
        assert_eq!(r.code(), 2);
    }

    #[test]
    fn test_resolve_unknown_without_other_uses_zero() {
        let enc = encoder(&["Hebbal", "Whitefield"]);
        let r = enc.resolve("NotARealPlace");
        assert_eq!(r, LocationResolution::Unmapped);
        assert_eq!(r.code(), DEFAULT_LOCATION_CODE);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let enc = encoder(&["Whitefield", "other"]);
        assert!(enc.resolve("whitefield").is_fallback());
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(LocationEncoder::new(vec![]), Err(Error::InvalidEncoder(_))));
        assert!(matches!(
            LocationEncoder::new(vec!["a".into(), "a".into()]),
            Err(Error::InvalidEncoder(_))
        ));
    }

    #[test]
    fn test_sorted_classes() {
        let enc = encoder(&["other", "Yelahanka", "Hebbal"]);
        assert_eq!(enc.sorted_classes(), vec!["Hebbal", "Yelahanka", "other"]);
        // codes are untouched by sorting
        assert_eq!(enc.encode("other"), Some(0));
    }

    #[test]
    fn test_deserialize_validates() {
        let enc: LocationEncoder =
            serde_json::from_str(r#"{"classes": ["Hebbal", "other"]}"#).unwrap();
        assert_eq!(enc.len(), 2);
        assert!(serde_json::from_str::<LocationEncoder>(r#"{"classes": []}"#).is_err());
    }
}
