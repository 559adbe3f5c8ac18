use std::collections::HashMap;

// Subject and study fields
pub const PATIENT_NAME: &str = "PatientName";
pub const STUDY_DESCRIPTION: &str = "StudyDescription";

// Series fields
pub const SERIES_DESCRIPTION: &str = "SeriesDescription";
pub const SERIES_NUMBER: &str = "SeriesNumber";
pub const SERIES_DATE: &str = "SeriesDate";
pub const SERIES_TIME: &str = "SeriesTime";

// Instance fields
pub const INSTANCE_NUMBER: &str = "InstanceNumber";
pub const ECHO_NUMBERS: &str = "EchoNumbers";

// Device/site fields
pub const STATION_NAME: &str = "StationName";
pub const INSTITUTION_NAME: &str = "InstitutionName";

/// Flat field-name to field-value mapping for one file
///
/// Built once by the dump parser and read-only afterwards. Lookup of an
/// absent field yields an empty value so downstream naming never panics;
/// a degenerate name is acceptable, a crash is not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(HashMap<String, String>);

impl FieldMap {
    /// Creates an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field value; later insertions of the same name win
    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.0.insert(name, value);
    }

    /// Returns the value for a field, or `""` if it was never dumped
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    /// Whether the field was present in the dump output
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of distinct fields captured
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields were captured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FieldMap {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_field_yields_empty_value() {
        let fields = FieldMap::new();
        assert_eq!(fields.get(PATIENT_NAME), "");
        assert!(!fields.contains(PATIENT_NAME));
    }

    #[test]
    fn test_last_insert_wins() {
        let mut fields = FieldMap::new();
        fields.insert(SERIES_NUMBER.to_string(), "1".to_string());
        fields.insert(SERIES_NUMBER.to_string(), "2".to_string());
        assert_eq!(fields.get(SERIES_NUMBER), "2");
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_from_pairs() {
        let fields = FieldMap::from([(PATIENT_NAME, "Doe^John"), (SERIES_DATE, "20040730")]);
        assert_eq!(fields.get(PATIENT_NAME), "Doe^John");
        assert_eq!(fields.get(SERIES_DATE), "20040730");
    }
}
