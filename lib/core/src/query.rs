use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// A single valuation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyQuery {
    pub location: String,
    pub total_sqft: f64,
    pub bhk: u32,
    pub bath: u32,
}

impl PropertyQuery {
    pub fn new(location: impl Into<String>, total_sqft: f64, bhk: u32, bath: u32) -> Self {
        Self {
            location: location.into(),
            total_sqft,
            bhk,
            bath,
        }
    }

    /// Check the query against the form bounds
    pub fn validate(&self, bounds: &QueryBounds) -> Result<()> {
        if !self.total_sqft.is_finite() || self.total_sqft <= 0.0 {
            return Err(Error::InvalidQuery(format!(
                "total_sqft must be a positive number, got {}",
                self.total_sqft
            )));
        }
        if self.total_sqft < bounds.min_sqft || self.total_sqft > bounds.max_sqft {
            return Err(Error::InvalidQuery(format!(
                "total_sqft must be within [{}, {}], got {}",
                bounds.min_sqft, bounds.max_sqft, self.total_sqft
            )));
        }
        if !bounds.rooms_in_range(self.bhk) {
            return Err(Error::InvalidQuery(format!(
                "bhk must be within [{}, {}], got {}",
                bounds.min_rooms, bounds.max_rooms, self.bhk
            )));
        }
        if !bounds.rooms_in_range(self.bath) {
            return Err(Error::InvalidQuery(format!(
                "bath must be within [{}, {}], got {}",
                bounds.min_rooms, bounds.max_rooms, self.bath
            )));
        }
        Ok(())
    }
}

/// Accepted input ranges; room bounds also clamp the sensitivity grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryBounds {
    pub min_sqft: f64,
    pub max_sqft: f64,
    pub min_rooms: u32,
    pub max_rooms: u32,
}

impl QueryBounds {
    #[inline]
    #[must_use]
    pub fn rooms_in_range(&self, rooms: u32) -> bool {
        rooms >= self.min_rooms && rooms <= self.max_rooms
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_sqft > 0.0 && self.min_sqft <= self.max_sqft) {
            return Err(Error::InvalidQuery(format!(
                "sqft bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_sqft, self.max_sqft
            )));
        }
        if self.min_rooms == 0 || self.min_rooms > self.max_rooms {
            return Err(Error::InvalidQuery(format!(
                "room bounds must satisfy 1 <= min <= max, got [{}, {}]",
                self.min_rooms, self.max_rooms
            )));
        }
        Ok(())
    }
}

impl Default for QueryBounds {
    fn default() -> Self {
        Self {
            min_sqft: 300.0,
            max_sqft: 10_000.0,
            min_rooms: 1,
            max_rooms: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_query() {
        let q = PropertyQuery::new("Whitefield", 1000.0, 2, 2);
        assert!(q.validate(&QueryBounds::default()).is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = QueryBounds::default();
        assert!(PropertyQuery::new("x", 300.0, 1, 1).validate(&bounds).is_ok());
        assert!(PropertyQuery::new("x", 10_000.0, 10, 10).validate(&bounds).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let bounds = QueryBounds::default();
        for q in [
            PropertyQuery::new("x", 0.0, 2, 2),
            PropertyQuery::new("x", -5.0, 2, 2),
            PropertyQuery::new("x", f64::NAN, 2, 2),
            PropertyQuery::new("x", 299.0, 2, 2),
            PropertyQuery::new("x", 10_001.0, 2, 2),
            PropertyQuery::new("x", 1000.0, 0, 2),
            PropertyQuery::new("x", 1000.0, 11, 2),
            PropertyQuery::new("x", 1000.0, 2, 0),
            PropertyQuery::new("x", 1000.0, 2, 11),
        ] {
            assert!(
                matches!(q.validate(&bounds), Err(Error::InvalidQuery(_))),
                "{:?} should be rejected",
                q
            );
        }
    }

    #[test]
    fn test_partial_bounds_fill_defaults() {
        let bounds: QueryBounds = serde_json::from_str(r#"{"max_rooms": 6}"#).unwrap();
        assert_eq!(bounds.max_rooms, 6);
        assert_eq!(bounds.min_sqft, 300.0);
        assert!(bounds.validate().is_ok());
    }

    #[test]
    fn test_bounds_validation() {
        let bounds = QueryBounds { min_rooms: 0, ..QueryBounds::default() };
        assert!(bounds.validate().is_err());
        let bounds = QueryBounds { min_sqft: 500.0, max_sqft: 400.0, ..QueryBounds::default() };
        assert!(bounds.validate().is_err());
    }
}
