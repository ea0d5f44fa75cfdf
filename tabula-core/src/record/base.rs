//! Base implementation of records.
use crate::error::TabulaError;
use chrono::prelude::{DateTime, Local};
use std::collections::{hash_map::Iter, HashMap};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single floating-point value, like a mean return.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

/// A container of named values.
#[derive(Debug, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges another record into this one in place.
    ///
    /// Values of `record` win on shared keys.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, TabulaError> {
        match self.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(TabulaError::RecordValueTypeError("Scalar".to_string())),
            None => Err(TabulaError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, TabulaError> {
        match self.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(TabulaError::RecordValueTypeError("String".to_string())),
            None => Err(TabulaError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_lookup() {
        let mut record = Record::from_scalar("train_secs", 0.5);
        record.merge_inplace(Record::from_slice(&[
            ("train_secs", RecordValue::Scalar(1.5)),
            ("algorithm", RecordValue::String("sarsa".into())),
        ]));
        assert_eq!(record.get_scalar("train_secs").unwrap(), 1.5);
        assert_eq!(record.get_string("algorithm").unwrap(), "sarsa");
        assert!(matches!(
            record.get_scalar("algorithm"),
            Err(TabulaError::RecordValueTypeError(_))
        ));
        assert!(matches!(
            record.get_scalar("missing"),
            Err(TabulaError::RecordKeyError(_))
        ));

        let mut merged = Record::empty();
        merged.merge_inplace(record);
        assert_eq!(merged.iter().count(), 2);
    }
}
