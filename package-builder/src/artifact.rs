use crate::{PackageError, PackageResult};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A file copied into the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// File names of the source archives present in `dist_dir`, sorted.
///
/// A missing `dist_dir` yields an empty list.
pub fn list_archives(dist_dir: &Path) -> PackageResult<Vec<String>> {
    matching_files(dist_dir, "*.tar.gz").map(|paths| {
        paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    })
}

/// Wheels in `dist_dir` whose file name starts with `prefix`.
pub fn find_wheels(dist_dir: &Path, prefix: &str) -> PackageResult<Vec<PathBuf>> {
    matching_files(dist_dir, &format!("{}*.whl", Pattern::escape(prefix)))
}

fn matching_files(dir: &Path, file_pattern: &str) -> PackageResult<Vec<PathBuf>> {
    let pattern = format!("{}/{}", Pattern::escape(&dir.to_string_lossy()), file_pattern);
    let mut paths: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Copy `source` into `dest_dir`, keeping its file name, and verify the copy.
pub fn stage_file(source: &Path, dest_dir: &Path) -> PackageResult<StagedFile> {
    let file_name = source.file_name().ok_or_else(|| {
        PackageError::InvalidConfig(format!("{} has no file name", source.display()))
    })?;
    let dest = dest_dir.join(file_name);

    debug!(from = %source.display(), to = %dest.display(), "copying");
    let bytes = fs::copy(source, &dest)?;
    verify_copy(source, &dest)?;

    info!(path = %dest.display(), bytes, "staged for upload");
    Ok(StagedFile { path: dest, bytes })
}

fn verify_copy(original: &Path, copy: &Path) -> PackageResult<()> {
    if fs::read(original)? != fs::read(copy)? {
        return Err(PackageError::IntegrityMismatch {
            original: original.to_path_buf(),
            copy: copy.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_archives_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b-1.0.tar.gz"), b"b").unwrap();
        fs::write(dir.path().join("a-1.0.tar.gz"), b"a").unwrap();
        fs::write(dir.path().join("a-1.0-py3-none-any.whl"), b"w").unwrap();
        fs::create_dir(dir.path().join("c.tar.gz")).unwrap();

        let names = list_archives(dir.path()).unwrap();
        assert_eq!(names, vec!["a-1.0.tar.gz", "b-1.0.tar.gz"]);
    }

    #[test]
    fn test_list_archives_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let names = list_archives(&dir.path().join("dist")).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_find_wheels_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("apoweroftrance_radio-0.0.1-py3-none-any.whl"), b"w").unwrap();
        fs::write(dir.path().join("apoweroftrance_radio-0.0.0-py3-none-any.whl"), b"old").unwrap();
        fs::write(dir.path().join("other-0.0.1-py3-none-any.whl"), b"x").unwrap();

        let wheels = find_wheels(dir.path(), "apoweroftrance_radio-0.0.1-").unwrap();
        assert_eq!(wheels.len(), 1);
        assert!(wheels[0].ends_with("apoweroftrance_radio-0.0.1-py3-none-any.whl"));
    }

    #[test]
    fn test_stage_file_copies_bytes() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("apoweroftrance-radio-0.0.1.tar.gz");
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        fs::write(&source, &payload).unwrap();

        let staged = stage_file(&source, dest_dir.path()).unwrap();
        assert_eq!(
            staged.path,
            dest_dir.path().join("apoweroftrance-radio-0.0.1.tar.gz")
        );
        assert_eq!(staged.bytes, 4096);
        assert_eq!(fs::read(&staged.path).unwrap(), payload);
    }

    #[test]
    fn test_stage_file_overwrites_previous_upload() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("pkg-1.tar.gz");
        fs::write(&source, b"new").unwrap();
        fs::write(dest_dir.path().join("pkg-1.tar.gz"), b"stale contents").unwrap();

        let staged = stage_file(&source, dest_dir.path()).unwrap();
        assert_eq!(fs::read(staged.path).unwrap(), b"new");
    }

    #[test]
    fn test_stage_missing_source() {
        let dest_dir = tempfile::tempdir().unwrap();
        let result = stage_file(Path::new("/nonexistent/pkg.tar.gz"), dest_dir.path());
        assert!(matches!(result, Err(PackageError::Io(_))));
    }
}
