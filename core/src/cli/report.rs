use crate::api::{FileOutcome, RunSummary};
use std::fmt;

/// Text report formatter for a run summary
pub struct TextReport<'a> {
    summary: &'a RunSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a RunSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Study Placement")?;
        writeln!(f, "===============")?;
        writeln!(f)?;
        writeln!(f, "Placed: {}", self.summary.placed())?;
        writeln!(f, "Failed: {}", self.summary.failed())?;
        writeln!(f)?;

        for outcome in &self.summary.outcomes {
            match outcome {
                FileOutcome::Placed {
                    source,
                    destination,
                } => {
                    writeln!(f, "{} -> {}", source.display(), destination.display())?;
                }
                FileOutcome::Failed { source, reason } => {
                    writeln!(f, "{} !! {}", source.display(), reason)?;
                }
            }
        }

        Ok(())
    }
}

/// Serializes a run summary to pretty JSON
#[cfg(feature = "json")]
pub fn json_report(summary: &RunSummary) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct OutcomeJson {
        source: String,
        destination: Option<String>,
        reason: Option<String>,
    }

    #[derive(Serialize)]
    struct SummaryJson {
        placed: usize,
        failed: usize,
        outcomes: Vec<OutcomeJson>,
    }

    let outcomes = summary
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            FileOutcome::Placed {
                source,
                destination,
            } => OutcomeJson {
                source: source.display().to_string(),
                destination: Some(destination.display().to_string()),
                reason: None,
            },
            FileOutcome::Failed { source, reason } => OutcomeJson {
                source: source.display().to_string(),
                destination: None,
                reason: Some(reason.clone()),
            },
        })
        .collect();

    serde_json::to_string_pretty(&SummaryJson {
        placed: summary.placed(),
        failed: summary.failed(),
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_summary() -> RunSummary {
        RunSummary {
            outcomes: vec![
                FileOutcome::Placed {
                    source: PathBuf::from("/incoming/study/img1"),
                    destination: PathBuf::from("/data/dicom/achtman/placed.dcm"),
                },
                FileOutcome::Failed {
                    source: PathBuf::from("/incoming/study/img2"),
                    reason: "metadata dump failed".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_text_report_format() {
        let summary = sample_summary();
        let output = format!("{}", TextReport::new(&summary));

        assert!(output.contains("Study Placement"));
        assert!(output.contains("Placed: 1"));
        assert!(output.contains("Failed: 1"));
        assert!(output.contains("/incoming/study/img1 -> /data/dicom/achtman/placed.dcm"));
        assert!(output.contains("/incoming/study/img2 !! metadata dump failed"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_report() {
        let summary = sample_summary();
        let json = json_report(&summary).unwrap();
        assert!(json.contains("\"placed\": 1"));
        assert!(json.contains("\"failed\": 1"));
    }
}
