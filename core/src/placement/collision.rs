use crate::error::{Result, SortError};
use crate::placement::digest::file_digest;
use log::{debug, warn};
use std::path::Path;

/// Ceiling on disambiguation attempts before placement fails
///
/// The original design iterated without bound; a directory flooded with
/// distinct same-named files would spin forever. 1000 variants of one stem
/// in one series directory means something upstream is broken.
pub const MAX_DISAMBIGUATION: u32 = 1000;

/// Decides the final filename for a file entering `dir`
///
/// The candidate `<stem>.<extension>` is accepted as-is when free, or when
/// the occupant has identical content (the move that follows simply
/// overwrites the already-placed copy). Otherwise `NonDupe1`, `NonDupe2`, …
/// suffixes are appended to the stem until a free name or a content match
/// turns up. A digest that cannot be computed on either side counts as "not
/// a duplicate", forcing the suffix path rather than aborting.
///
/// # Errors
///
/// Returns a placement error once [`MAX_DISAMBIGUATION`] suffixes are
/// exhausted.
pub fn resolve_collision(dir: &Path, stem: &str, extension: &str, source: &Path) -> Result<String> {
    let mut candidate = format!("{stem}.{extension}");
    let mut suffix = 0u32;

    loop {
        let occupant = dir.join(&candidate);
        if !occupant.exists() {
            return Ok(candidate);
        }

        if same_content(source, &occupant) {
            debug!(
                "{} already placed as {}, keeping name",
                source.display(),
                occupant.display()
            );
            return Ok(candidate);
        }

        suffix += 1;
        if suffix > MAX_DISAMBIGUATION {
            return Err(SortError::Placement(format!(
                "no free name for {} in {} after {} attempts",
                stem,
                dir.display(),
                MAX_DISAMBIGUATION
            )));
        }
        candidate = format!("{stem}NonDupe{suffix}.{extension}");
    }
}

fn same_content(source: &Path, occupant: &Path) -> bool {
    let source_digest = match file_digest(source) {
        Ok(d) => d,
        Err(e) => {
            warn!("cannot digest {}: {}", source.display(), e);
            return false;
        }
    };
    let occupant_digest = match file_digest(occupant) {
        Ok(d) => d,
        Err(e) => {
            warn!("cannot digest {}: {}", occupant.display(), e);
            return false;
        }
    };
    source_digest == occupant_digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STEM: &str = "Doe_John.20040730.105719.3.t1_se_tra.Echo_1.0007";

    fn source_file(dir: &TempDir, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join("incoming.dcm");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_free_name_is_accepted_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_file(&temp_dir, b"data");

        let name = resolve_collision(temp_dir.path(), STEM, "dcm", &source).unwrap();
        assert_eq!(name, format!("{STEM}.dcm"));
    }

    #[test]
    fn test_identical_occupant_keeps_name() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_file(&temp_dir, b"same bytes");
        std::fs::write(temp_dir.path().join(format!("{STEM}.dcm")), b"same bytes").unwrap();

        let name = resolve_collision(temp_dir.path(), STEM, "dcm", &source).unwrap();
        assert_eq!(name, format!("{STEM}.dcm"));
    }

    #[test]
    fn test_distinct_occupant_gets_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_file(&temp_dir, b"new acquisition");
        std::fs::write(temp_dir.path().join(format!("{STEM}.dcm")), b"old file").unwrap();

        let name = resolve_collision(temp_dir.path(), STEM, "dcm", &source).unwrap();
        assert_eq!(name, format!("{STEM}NonDupe1.dcm"));
    }

    #[test]
    fn test_suffix_increments_until_free() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_file(&temp_dir, b"new acquisition");
        std::fs::write(temp_dir.path().join(format!("{STEM}.dcm")), b"one").unwrap();
        std::fs::write(
            temp_dir.path().join(format!("{STEM}NonDupe1.dcm")),
            b"two",
        )
        .unwrap();

        let name = resolve_collision(temp_dir.path(), STEM, "dcm", &source).unwrap();
        assert_eq!(name, format!("{STEM}NonDupe2.dcm"));
    }

    #[test]
    fn test_suffixed_duplicate_is_recognized() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_file(&temp_dir, b"repeat delivery");
        std::fs::write(temp_dir.path().join(format!("{STEM}.dcm")), b"other").unwrap();
        std::fs::write(
            temp_dir.path().join(format!("{STEM}NonDupe1.dcm")),
            b"repeat delivery",
        )
        .unwrap();

        let name = resolve_collision(temp_dir.path(), STEM, "dcm", &source).unwrap();
        assert_eq!(name, format!("{STEM}NonDupe1.dcm"));
    }

    #[test]
    fn test_unreadable_source_forces_suffix_path() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(format!("{STEM}.dcm")), b"occupant").unwrap();

        // source does not exist, so digests cannot match
        let missing = temp_dir.path().join("gone.dcm");
        let name = resolve_collision(temp_dir.path(), STEM, "dcm", &missing).unwrap();
        assert_eq!(name, format!("{STEM}NonDupe1.dcm"));
    }
}
