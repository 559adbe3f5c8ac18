use crate::extraction::fields::{
    FieldMap, ECHO_NUMBERS, INSTANCE_NUMBER, PATIENT_NAME, SERIES_DATE, SERIES_DESCRIPTION,
    SERIES_NUMBER, SERIES_TIME,
};
use crate::naming::sanitize::{sanitize_description, strip_reserved, underscore_unsafe};

/// Reduces an acquisition time to whole seconds
///
/// Times arrive as `HHMMSS[.ffffff]`; only the leading digit run is kept,
/// dropping the fractional part (and anything else unexpected after it).
pub fn truncate_time(time: &str) -> &str {
    let end = time
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(time.len());
    &time[..end]
}

/// Zero-pads an instance number to at least 4 characters
///
/// Guarantees that a naive string sort of the finished filenames matches
/// acquisition order within a series (`0001 < 0002 < ... < 0010 < 0011`).
/// Longer values pass through unchanged, and non-numeric values are padded
/// rather than rejected; the field is expected numeric but padding must not
/// fail when it is not.
pub fn pad_instance(instance: &str) -> String {
    format!("{instance:0>4}")
}

/// Builds the series title: `<series-number>.<sanitized series-description>`
pub fn series_title(fields: &FieldMap) -> String {
    format!(
        "{}.{}",
        fields.get(SERIES_NUMBER),
        sanitize_description(fields.get(SERIES_DESCRIPTION))
    )
}

/// Synthesizes the filename stem for one acquisition file
///
/// A pure function of the field map: it never consults the filesystem, so
/// the same fields always produce the same stem. Uniqueness on disk is the
/// collision resolver's job, not this one's.
pub fn synthesize_stem(fields: &FieldMap) -> String {
    let subject = underscore_unsafe(fields.get(PATIENT_NAME));
    let time = truncate_time(fields.get(SERIES_TIME));
    let stem = format!(
        "{}.{}.{}.{}.Echo_{}.{}",
        subject,
        fields.get(SERIES_DATE),
        time,
        series_title(fields),
        fields.get(ECHO_NUMBERS),
        pad_instance(fields.get(INSTANCE_NUMBER)),
    );
    strip_reserved(&stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_fields() -> FieldMap {
        FieldMap::from([
            (PATIENT_NAME, "Doe^John"),
            (SERIES_DATE, "20040730"),
            (SERIES_TIME, "105719.125000"),
            (SERIES_DESCRIPTION, "t1 se tra"),
            (SERIES_NUMBER, "3"),
            (INSTANCE_NUMBER, "7"),
            (ECHO_NUMBERS, "1"),
        ])
    }

    #[rstest]
    #[case("105719.125000", "105719")]
    #[case("105719", "105719")]
    #[case("", "")]
    #[case(".5", "")]
    fn test_truncate_time(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(truncate_time(input), expected);
    }

    #[rstest]
    #[case("7", "0007")]
    #[case("123", "0123")]
    #[case("1234", "1234")]
    #[case("12345", "12345")]
    #[case("", "0000")]
    #[case("x", "000x")]
    fn test_pad_instance(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(pad_instance(input), expected);
    }

    #[test]
    fn test_padded_stems_sort_in_acquisition_order() {
        let mut stems: Vec<String> = (1..=11)
            .map(|n| {
                let mut fields = sample_fields();
                fields.insert(INSTANCE_NUMBER.to_string(), n.to_string());
                synthesize_stem(&fields)
            })
            .collect();
        let acquisition_order = stems.clone();
        stems.sort();
        assert_eq!(stems, acquisition_order);
    }

    #[test]
    fn test_reference_stem() {
        assert_eq!(
            synthesize_stem(&sample_fields()),
            "Doe_John.20040730.105719.3.t1_se_tra.Echo_1.0007"
        );
    }

    #[test]
    fn test_stem_is_deterministic() {
        assert_eq!(
            synthesize_stem(&sample_fields()),
            synthesize_stem(&sample_fields())
        );
    }

    #[test]
    fn test_empty_fields_produce_degenerate_stem_without_panic() {
        // subject/date/time/echo are empty, series title degenerates to "."
        let stem = synthesize_stem(&FieldMap::new());
        assert_eq!(stem, ".....Echo_.0000");
    }

    #[test]
    fn test_final_pass_strips_unsanitized_fields() {
        let mut fields = sample_fields();
        // series-date never goes through a sanitizer of its own
        fields.insert(SERIES_DATE.to_string(), "2004<07>30".to_string());
        let stem = synthesize_stem(&fields);
        assert!(!stem.contains('<'));
        assert!(!stem.contains('>'));
        assert!(stem.contains("20040730"));
    }
}
