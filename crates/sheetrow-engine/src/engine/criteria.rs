use super::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An equality filter over record fields.
///
/// A record matches when every criteria label maps to exactly the same string
/// in the record. No coercion happens: `"34"` and `"34.0"` are different
/// values, and a label the record does not have never matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(IndexMap<String, String>);

impl Criteria {
    /// Criteria that match every record.
    pub fn any() -> Self {
        Criteria(IndexMap::new())
    }

    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(label.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.0
            .iter()
            .all(|(label, expected)| record.get(label) == Some(expected.as_str()))
    }

    /// Row indexes (0-based, in row order) of the records that match.
    pub fn matching_indexes(&self, records: &[Record]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .map(|(index, _)| index)
            .collect()
    }

    /// The matching subset of `records`, in row order.
    pub fn filter<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Criteria(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Criteria {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<Record> {
        vec![
            Record::from([("Name", "Andreas"), ("Age", "34"), ("Weight", "80")]),
            Record::from([("Name", "Ben"), ("Age", "9"), ("Weight", "")]),
            Record::from([("Name", "Andreas"), ("Age", "12"), ("Weight", "40")]),
        ]
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let records = people();
        assert_eq!(Criteria::any().matching_indexes(&records), vec![0, 1, 2]);
    }

    #[test]
    fn test_every_key_must_match() {
        let records = people();
        let criteria = Criteria::from([("Name", "Andreas"), ("Age", "12")]);
        assert_eq!(criteria.matching_indexes(&records), vec![2]);
    }

    #[test]
    fn test_blank_value_matches_blank_field() {
        let records = people();
        let criteria = Criteria::any().with("Weight", "");
        assert_eq!(criteria.filter(&records), vec![&records[1]]);
    }

    #[test]
    fn test_no_coercion() {
        let records = people();
        assert!(Criteria::from([("Age", "34.0")]).filter(&records).is_empty());
        assert!(Criteria::from([("age", "34")]).filter(&records).is_empty());
    }

    #[test]
    fn test_unknown_label_never_matches() {
        let records = people();
        let criteria = Criteria::from([("Sex", "")]);
        assert!(criteria.matching_indexes(&records).is_empty());
    }
}
