use crate::error::{Result, SortError};
use crate::extraction::dump::parse_dump;
use crate::extraction::fields::FieldMap;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Source of per-file metadata
///
/// Abstracts the external dump tool so the pipeline can be driven by a fake
/// in tests without spawning subprocesses.
pub trait MetadataSource {
    /// Extracts the field map for one acquisition file
    fn field_map(&self, path: &Path) -> Result<FieldMap>;
}

/// Metadata source backed by an external dump tool subprocess
///
/// Invokes `<tool> <file>` and parses the line-oriented tag dump from its
/// standard output. A non-zero exit status means the file is malformed or
/// unreadable; the error carries the tool's stderr for the operator.
pub struct DcmdumpSource {
    tool: PathBuf,
}

impl DcmdumpSource {
    /// Creates a source using the given dump tool command or path
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    /// Verifies the dump tool exists before any file is processed
    ///
    /// Bare command names are searched on `PATH`; anything with a path
    /// separator is checked directly.
    pub fn probe(&self) -> Result<()> {
        let found = if self.tool.components().count() > 1 {
            self.tool.is_file()
        } else {
            which::which(&self.tool).is_ok()
        };
        if found {
            Ok(())
        } else {
            Err(SortError::ToolMissing(self.tool.display().to_string()))
        }
    }
}

impl MetadataSource for DcmdumpSource {
    fn field_map(&self, path: &Path) -> Result<FieldMap> {
        let output = Command::new(&self.tool)
            .arg(path)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SortError::ToolMissing(self.tool.display().to_string())
                }
                _ => SortError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SortError::DumpFailed {
                path: path.to_path_buf(),
                detail: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        let fields = parse_dump(&String::from_utf8_lossy(&output.stdout));
        debug!(
            "extracted {} fields from {}",
            fields.len(),
            path.display()
        );
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fields::{PATIENT_NAME, SERIES_DATE};
    use std::fs::File;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Writes an executable stub that plays the role of the dump tool
    fn write_stub(dir: &TempDir, name: &str, script: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        writeln!(file, "{}", script).unwrap();
        drop(file);
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_field_map_from_stub_tool() {
        let temp_dir = TempDir::new().unwrap();
        let tool = write_stub(
            &temp_dir,
            "dump-ok",
            "echo '(0010,0010) PN [Doe^John]    #   8, 1 PatientName'\n\
             echo '(0008,0021) DA [20040730]    #   8, 1 SeriesDate'",
        );

        let source = DcmdumpSource::new(&tool);
        let fields = source.field_map(Path::new("ignored.dcm")).unwrap();
        assert_eq!(fields.get(PATIENT_NAME), "Doe^John");
        assert_eq!(fields.get(SERIES_DATE), "20040730");
    }

    #[test]
    fn test_nonzero_exit_reports_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let tool = write_stub(&temp_dir, "dump-bad", "echo 'cannot read file' >&2\nexit 1");

        let source = DcmdumpSource::new(&tool);
        let err = source.field_map(Path::new("broken.dcm")).unwrap_err();
        match err {
            SortError::DumpFailed { path, detail } => {
                assert_eq!(path, Path::new("broken.dcm"));
                assert!(detail.contains("cannot read file"));
            }
            other => panic!("expected DumpFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_probe_missing_tool() {
        let source = DcmdumpSource::new("/nonexistent/bin/dcmdump");
        assert!(matches!(
            source.probe(),
            Err(SortError::ToolMissing(_))
        ));

        let source = DcmdumpSource::new("definitely-not-a-real-command-42");
        assert!(source.probe().is_err());
    }

    #[test]
    fn test_probe_existing_tool() {
        let source = DcmdumpSource::new("/bin/sh");
        assert!(source.probe().is_ok());
    }
}
