use crate::patch::{Direction, Mode, PatchError, PatchSpec};
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("no files specified")]
    NoFilesSpecified,

    #[error("patch rejected: {0}")]
    Rejected(#[from] PatchError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot patch {path}: {source}")]
    Patch { path: PathBuf, source: PatchError },
}

/// What happened to one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "FileOutcome should be checked for patched/unchanged"]
pub enum FileOutcome {
    /// Contents changed (and were written unless this was a dry run)
    Patched {
        file: PathBuf,
        bytes_before: usize,
        bytes_after: usize,
    },
    /// Pattern did not match, file left alone
    Unchanged { file: PathBuf },
}

impl FileOutcome {
    pub fn file(&self) -> &Path {
        match self {
            FileOutcome::Patched { file, .. } | FileOutcome::Unchanged { file } => file,
        }
    }

    pub fn is_patched(&self) -> bool {
        matches!(self, FileOutcome::Patched { .. })
    }
}

/// Runs one patch over a list of files, one full read/patch/write cycle at a
/// time.
#[derive(Debug, Clone, Copy)]
pub struct FilePatcher<'a> {
    spec: &'a PatchSpec,
    direction: Direction,
    dry_run: bool,
}

impl<'a> FilePatcher<'a> {
    pub fn new(spec: &'a PatchSpec, direction: Direction) -> Self {
        Self {
            spec,
            direction,
            dry_run: false,
        }
    }

    /// Compute and report changes without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Patch every file in order, stopping at the first error.
    ///
    /// `on_change` sees the path, old contents and new contents of each file
    /// that changes. Files already written before an error stay written.
    pub fn run<P, F>(&self, files: &[P], mut on_change: F) -> Result<Vec<FileOutcome>, FileError>
    where
        P: AsRef<Path>,
        F: FnMut(&Path, &str, &str),
    {
        if files.is_empty() {
            return Err(FileError::NoFilesSpecified);
        }
        if self.direction == Direction::Revert && self.spec.mode == Mode::Replace {
            return Err(PatchError::UnsupportedModeForRevert.into());
        }

        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            outcomes.push(self.patch_file(file.as_ref(), &mut on_change)?);
        }
        Ok(outcomes)
    }

    /// Read, patch and write back a single file.
    pub fn patch_file<F>(&self, path: &Path, on_change: &mut F) -> Result<FileOutcome, FileError>
    where
        F: FnMut(&Path, &str, &str),
    {
        let original = fs::read_to_string(path).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let patched = self
            .spec
            .run(self.direction, &original)
            .map_err(|source| FileError::Patch {
                path: path.to_path_buf(),
                source,
            })?;

        if patched == original {
            debug!("{}: no match, nothing to {}", path.display(), self.direction);
            return Ok(FileOutcome::Unchanged {
                file: path.to_path_buf(),
            });
        }

        on_change(path, &original, &patched);

        if self.dry_run {
            info!("{}: would {} patch (dry run)", path.display(), self.direction);
        } else {
            atomic_write(path, patched.as_bytes()).map_err(|source| FileError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!("{}: {} patch", path.display(), self.direction);
        }

        Ok(FileOutcome::Patched {
            file: path.to_path_buf(),
            bytes_before: original.len(),
            bytes_after: patched.len(),
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// The original file's permissions carry over to the replacement.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Same directory keeps the rename on one filesystem
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Pattern;

    fn prepend_x() -> PatchSpec {
        PatchSpec::new(Pattern::new("</a>").unwrap(), "X").with_mode(Mode::Prepend)
    }

    #[test]
    fn test_no_files_specified() {
        let spec = prepend_x();
        let files: Vec<PathBuf> = Vec::new();
        let result = FilePatcher::new(&spec, Direction::Apply).run(&files, |_, _, _| {});
        assert!(matches!(result, Err(FileError::NoFilesSpecified)));
    }

    #[test]
    fn test_apply_then_revert_on_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("page.html");
        fs::write(&file_path, "<a></a>").unwrap();

        let spec = prepend_x();
        let outcomes = FilePatcher::new(&spec, Direction::Apply)
            .run(&[&file_path], |_, _, _| {})
            .unwrap();
        assert_eq!(
            outcomes,
            vec![FileOutcome::Patched {
                file: file_path.clone(),
                bytes_before: 7,
                bytes_after: 8,
            }]
        );
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "<a>X</a>");

        let outcomes = FilePatcher::new(&spec, Direction::Revert)
            .run(&[&file_path], |_, _, _| {})
            .unwrap();
        assert!(outcomes[0].is_patched());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "<a></a>");
    }

    #[test]
    fn test_unmatched_file_is_unchanged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("plain.txt");
        fs::write(&file_path, "nothing here").unwrap();

        let spec = prepend_x();
        let mut changes = 0;
        let outcomes = FilePatcher::new(&spec, Direction::Apply)
            .run(&[&file_path], |_, _, _| changes += 1)
            .unwrap();
        assert_eq!(
            outcomes,
            vec![FileOutcome::Unchanged {
                file: file_path.clone()
            }]
        );
        assert_eq!(changes, 0);
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("page.html");
        fs::write(&file_path, "<a></a>").unwrap();

        let spec = prepend_x();
        let mut seen = Vec::new();
        let outcomes = FilePatcher::new(&spec, Direction::Apply)
            .dry_run(true)
            .run(&[&file_path], |_, before, after| {
                seen.push((before.to_string(), after.to_string()))
            })
            .unwrap();

        assert!(outcomes[0].is_patched());
        assert_eq!(seen, vec![("<a></a>".to_string(), "<a>X</a>".to_string())]);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "<a></a>");
    }

    #[test]
    fn test_missing_file_aborts_remaining() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.html");
        let later = temp_dir.path().join("later.html");
        fs::write(&later, "<a></a>").unwrap();

        let spec = prepend_x();
        let result = FilePatcher::new(&spec, Direction::Apply).run(&[&missing, &later], |_, _, _| {});
        assert!(matches!(result, Err(FileError::Read { .. })));
        assert_eq!(fs::read_to_string(&later).unwrap(), "<a></a>");
    }

    #[test]
    fn test_replace_revert_fails_before_writing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("page.html");
        fs::write(&file_path, "<a>X</a>").unwrap();

        let spec = prepend_x().with_mode(Mode::Replace);
        let result = FilePatcher::new(&spec, Direction::Revert).run(&[&file_path], |_, _, _| {});
        assert!(matches!(
            result,
            Err(FileError::Rejected(PatchError::UnsupportedModeForRevert))
        ));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "<a>X</a>");
    }

    #[test]
    #[cfg(unix)]
    fn test_atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("script.sh");
        fs::write(&file_path, "echo hi\n").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o755)).unwrap();

        atomic_write(&file_path, b"echo bye\n").unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "echo bye\n");
    }
}
