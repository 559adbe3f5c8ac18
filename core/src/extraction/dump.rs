use crate::extraction::fields::FieldMap;
use regex::Regex;
use std::sync::OnceLock;

/// Matches one tag line of dump-tool output
///
/// The tool prints one element per line, e.g.
///
/// ```text
/// (0008,103e) LO [t1 se tra]              #  10, 1 SeriesDescription
/// ```
///
/// The bracketed value and the trailing `#  <length>, <multiplicity> <Keyword>`
/// annotation are both required for a line to count; anything else (group
/// headers, binary elements, `(no value available)` placeholders) is ignored.
/// Malformed dump output is expected input, not an error.
fn line_pattern() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\[(.*)\].*#\s+(\d+),\s*(\d+)\s+(\w+)\s*$").expect("Failed to compile regex")
    })
}

/// Parses dump-tool output into a field map
///
/// Scans every line for the tag pattern; the last occurrence of a repeated
/// keyword wins, matching how the dump tool emits nested sequences after
/// their top-level counterparts.
pub fn parse_dump(output: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    for line in output.lines() {
        if let Some(caps) = line_pattern().captures(line) {
            let value = caps[1].to_string();
            let name = caps[4].to_string();
            fields.insert(name, value);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fields::{
        ECHO_NUMBERS, INSTANCE_NUMBER, PATIENT_NAME, SERIES_DESCRIPTION, SERIES_TIME,
        STUDY_DESCRIPTION,
    };

    const SAMPLE_DUMP: &str = "\
# Dicom-Data-Set
# Used TransferSyntax: Little Endian Explicit
(0008,0018) UI [1.3.12.2.1107.5.2.32.35177.2004073010]  #  38, 1 SOPInstanceUID
(0008,1030) LO [ACHTMAN^FMRI]                           #  12, 1 StudyDescription
(0008,103e) LO [t1 se tra]                              #  10, 1 SeriesDescription
(0010,0010) PN [Doe^John]                               #   8, 1 PatientName
(0018,0086) IS [1]                                      #   2, 1 EchoNumbers
(0008,0031) TM [105719.125000]                          #  14, 1 SeriesTime
(0020,0013) IS [7]                                      #   2, 1 InstanceNumber
(7fe0,0010) OW 0000\\0000\\0000\\0000...                #  131072, 1 PixelData
";

    #[test]
    fn test_parses_bracketed_values() {
        let fields = parse_dump(SAMPLE_DUMP);
        assert_eq!(fields.get(PATIENT_NAME), "Doe^John");
        assert_eq!(fields.get(STUDY_DESCRIPTION), "ACHTMAN^FMRI");
        assert_eq!(fields.get(SERIES_DESCRIPTION), "t1 se tra");
        assert_eq!(fields.get(SERIES_TIME), "105719.125000");
        assert_eq!(fields.get(INSTANCE_NUMBER), "7");
        assert_eq!(fields.get(ECHO_NUMBERS), "1");
    }

    #[test]
    fn test_ignores_lines_without_value_or_counts() {
        let fields = parse_dump(
            "# Dicom-Data-Set\n\
             (0010,0010) PN (no value available)         #   0, 0 PatientName\n\
             (0008,1030) LO [Orphan value without annotation]\n\
             random noise\n",
        );
        assert!(fields.is_empty());
    }

    #[test]
    fn test_last_occurrence_of_a_field_wins() {
        let fields = parse_dump(
            "(0008,103e) LO [outer]                      #   5, 1 SeriesDescription\n\
             (0008,103e) LO [inner]                      #   5, 1 SeriesDescription\n",
        );
        assert_eq!(fields.get(SERIES_DESCRIPTION), "inner");
    }

    #[test]
    fn test_value_may_contain_brackets() {
        let fields = parse_dump(
            "(0008,1030) LO [STUDY [PILOT]]              #  13, 1 StudyDescription\n",
        );
        assert_eq!(fields.get(STUDY_DESCRIPTION), "STUDY [PILOT]");
    }

    #[test]
    fn test_empty_value_is_captured() {
        let fields = parse_dump("(0008,1030) LO []        #   0, 1 StudyDescription\n");
        assert!(fields.contains(STUDY_DESCRIPTION));
        assert_eq!(fields.get(STUDY_DESCRIPTION), "");
    }
}
