use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Number of features the regressor consumes
pub const FEATURE_COUNT: usize = 4;

/// Column positions inside a [`FeatureVector`]
pub const LOCATION_INDEX: usize = 0;
pub const TOTAL_SQFT_INDEX: usize = 1;
pub const BATH_INDEX: usize = 2;
pub const BHK_INDEX: usize = 3;

/// Fixed-order model input: `[location_code, total_sqft, bath, bhk]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(location_code: u32, total_sqft: f64, bath: u32, bhk: u32) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        values[LOCATION_INDEX] = f64::from(location_code);
        values[TOTAL_SQFT_INDEX] = total_sqft;
        values[BATH_INDEX] = f64::from(bath);
        values[BHK_INDEX] = f64::from(bhk);
        Self(values)
    }

    /// Same location and area, different room counts
    #[inline]
    #[must_use]
    pub fn with_rooms(&self, bhk: u32, bath: u32) -> Self {
        let mut values = self.0;
        values[BATH_INDEX] = f64::from(bath);
        values[BHK_INDEX] = f64::from(bhk);
        Self(values)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }
}

/// Display labels for each feature position, in vector order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FeatureColumns(Vec<String>);

impl FeatureColumns {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.len() != FEATURE_COUNT {
            return Err(Error::FeatureCount {
                expected: FEATURE_COUNT,
                actual: columns.len(),
            });
        }
        Ok(Self(columns))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for FeatureColumns {
    fn default() -> Self {
        Self(
            ["location", "total_sqft", "bath", "bhk"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_order() {
        let v = FeatureVector::new(7, 1250.0, 2, 3);
        assert_eq!(v.as_slice(), &[7.0, 1250.0, 2.0, 3.0]);
    }

    #[test]
    fn test_with_rooms_keeps_location_and_area() {
        let v = FeatureVector::new(4, 900.0, 1, 1).with_rooms(3, 2);
        assert_eq!(v.get(LOCATION_INDEX), Some(4.0));
        assert_eq!(v.get(TOTAL_SQFT_INDEX), Some(900.0));
        assert_eq!(v.get(BATH_INDEX), Some(2.0));
        assert_eq!(v.get(BHK_INDEX), Some(3.0));
    }

    #[test]
    fn test_columns_length_checked() {
        let err = FeatureColumns::new(vec!["a".into(), "b".into()]).unwrap_err();
        assert_eq!(err, Error::FeatureCount { expected: 4, actual: 2 });
        assert_eq!(FeatureColumns::default().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_columns_deserialize_as_plain_list() {
        let columns: FeatureColumns =
            serde_json::from_str(r#"["location","total_sqft","bath","bhk"]"#).unwrap();
        assert_eq!(columns, FeatureColumns::default());
    }
}
