//! Byte-buffer persistence with an explicit conflict policy.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::report::ReportWrite;
use crate::spec::{EnumWriteConflictStrategy, SpecWriteOptions};

/// Persist `v_bytes` at `path_file_out`.
///
/// - `Overwrite` writes a sibling temporary file and renames it over the target.
///   The result keeps the permissions of the replaced file, or the umask default
///   for a new one.
/// - `Append` opens (or creates) the target and appends.
/// - `Error` creates the target and fails with `AlreadyExists` if present.
///
/// Errors are returned unmodified. A missing parent directory is `NotFound`
/// unless `if_create_parent_dirs` is set.
pub fn write_bytes(
    path_file_out: &Path,
    v_bytes: &[u8],
    options: &SpecWriteOptions,
) -> io::Result<ReportWrite> {
    let path_dir_parent = derive_parent_dir(path_file_out);
    if options.if_create_parent_dirs {
        fs::create_dir_all(path_dir_parent)?;
    }

    let mut if_appended = false;
    match options.rule_conflict {
        EnumWriteConflictStrategy::Overwrite => {
            let mut file_tmp = create_sibling_temp_file(path_dir_parent, path_file_out)?;
            file_tmp.write_all(v_bytes)?;
            file_tmp.as_file().sync_all()?;
            file_tmp.persist(path_file_out).map_err(|err| err.error)?;
        }
        EnumWriteConflictStrategy::Append => {
            let mut file_out = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path_file_out)?;
            if_appended = file_out.metadata()?.len() > 0;
            file_out.write_all(v_bytes)?;
            file_out.sync_all()?;
        }
        EnumWriteConflictStrategy::Error => {
            let mut file_out = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path_file_out)?;
            file_out.write_all(v_bytes)?;
            file_out.sync_all()?;
        }
    }

    debug!(
        path = %path_file_out.display(),
        n_bytes = v_bytes.len(),
        rule_conflict = ?options.rule_conflict,
        "bytes written"
    );
    Ok(ReportWrite {
        path: path_file_out.to_path_buf(),
        n_bytes_written: v_bytes.len() as u64,
        if_appended,
    })
}

fn create_sibling_temp_file(
    path_dir_parent: &Path,
    path_file_out: &Path,
) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    // Mode is masked by the process umask at creation.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let file_tmp = builder.tempfile_in(path_dir_parent)?;

    match fs::metadata(path_file_out) {
        Ok(meta) => file_tmp.as_file().set_permissions(meta.permissions())?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    Ok(file_tmp)
}

fn derive_parent_dir(path_file_out: &Path) -> &Path {
    match path_file_out.parent() {
        Some(path_parent) if !path_parent.as_os_str().is_empty() => path_parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn test_overwrite_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.bin");
        fs::write(&path, b"old content").expect("seed");

        let report = write_bytes(&path, b"new", &SpecWriteOptions::default()).expect("write");

        assert_eq!(fs::read(&path).expect("read"), b"new");
        assert_eq!(report.n_bytes_written, 3);
        assert!(!report.if_appended);
        assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
    }

    #[test]
    fn test_append_extends_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        let options = SpecWriteOptions {
            rule_conflict: EnumWriteConflictStrategy::Append,
            ..Default::default()
        };

        let report_first = write_bytes(&path, b"ab", &options).expect("first");
        let report_second = write_bytes(&path, b"cd", &options).expect("second");

        assert_eq!(fs::read(&path).expect("read"), b"abcd");
        assert!(!report_first.if_appended);
        assert!(report_second.if_appended);
    }

    #[test]
    fn test_error_mode_refuses_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        let options = SpecWriteOptions {
            rule_conflict: EnumWriteConflictStrategy::Error,
            ..Default::default()
        };

        write_bytes(&path, b"first", &options).expect("create");
        let err = write_bytes(&path, b"second", &options).expect_err("must fail");

        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).expect("read"), b"first");
    }

    #[test]
    fn test_missing_parent_is_not_found_unless_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a").join("b").join("out.txt");

        let err = write_bytes(&path, b"x", &SpecWriteOptions::default()).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let options = SpecWriteOptions {
            if_create_parent_dirs: true,
            ..Default::default()
        };
        write_bytes(&path, b"x", &options).expect("write");
        assert_eq!(fs::read(&path).expect("read"), b"x");
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_uses_same_mode_as_other_conflict_rules() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path_created = dir.path().join("created.txt");
        let path_replaced = dir.path().join("replaced.txt");
        let options_error = SpecWriteOptions {
            rule_conflict: EnumWriteConflictStrategy::Error,
            ..Default::default()
        };

        write_bytes(&path_created, b"x", &options_error).expect("create");
        write_bytes(&path_replaced, b"x", &SpecWriteOptions::default()).expect("overwrite");

        let derive_mode = |path: &Path| {
            fs::metadata(path).expect("metadata").permissions().mode() & 0o777
        };
        assert_eq!(derive_mode(&path_replaced), derive_mode(&path_created));
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_mode_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.bin");
        fs::write(&path, b"old").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).expect("chmod");

        write_bytes(&path, b"new", &SpecWriteOptions::default()).expect("write");

        let n_mode = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(n_mode, 0o640);
        assert_eq!(fs::read(&path).expect("read"), b"new");
    }

    #[test]
    fn test_parent_of_bare_file_name_is_current_dir() {
        assert_eq!(derive_parent_dir(Path::new("out.txt")), Path::new("."));
        assert_eq!(derive_parent_dir(Path::new("a/out.txt")), Path::new("a"));
    }
}
