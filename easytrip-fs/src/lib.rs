//! Capability-scoped filesystem helpers for durable route storage.
//!
//! Callers open one directory with ambient authority and perform every later
//! operation relative to that handle, so a storage key can never escape the
//! directory it was configured with.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Write};
use std::path::Component;

/// Suffix appended to a file name while its replacement is being written.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Open `path` as a directory, creating it and any missing parents first.
pub fn open_or_create_dir(path: &Utf8Path) -> io::Result<fs_utf8::Dir> {
    let (base, relative) = base_dir_and_relative(path)?;
    if relative.as_os_str().is_empty() {
        return Ok(base);
    }
    base.create_dir_all(&relative)?;
    base.open_dir(&relative)
}

/// Read `name` from `dir` as UTF-8, returning `None` when it does not exist.
pub fn read_optional(dir: &fs_utf8::Dir, name: &str) -> io::Result<Option<String>> {
    match dir.read_to_string(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Replace `name` in `dir` with `contents`.
///
/// The bytes are written and synced to a sibling file first and then renamed
/// over the target, so readers observe either the old or the new content.
pub fn replace_file(dir: &fs_utf8::Dir, name: &str, contents: &[u8]) -> io::Result<()> {
    let partial = format!("{name}{PARTIAL_SUFFIX}");
    if let Err(err) = write_synced(dir, &partial, contents) {
        // Best effort; the original error is more useful to the caller.
        drop(dir.remove_file(&partial));
        return Err(err);
    }
    dir.rename(&partial, dir, name)
}

fn write_synced(dir: &fs_utf8::Dir, name: &str, contents: &[u8]) -> io::Result<()> {
    let mut file = dir.create(name)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Delete `name` from `dir`; a missing file is not an error.
pub fn remove_if_exists(dir: &fs_utf8::Dir, name: &str) -> io::Result<()> {
    match dir.remove_file(name) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

/// Split an absolute or relative path into an ambient base directory and a
/// relative suffix that `cap-std` can resolve beneath it.
pub fn base_dir_and_relative(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();

    let (base, relative) = match std_path.components().next() {
        // Windows drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_path.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_path.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[test]
    fn creates_nested_directories() {
        let temp = TempDir::new().expect("temp dir");
        let nested = utf8_root(&temp).join("state/routes");
        let dir = open_or_create_dir(&nested).expect("open");
        replace_file(&dir, "slot.json", b"{}").expect("write");
        assert!(nested.join("slot.json").as_std_path().is_file());
    }

    #[test]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().expect("temp dir");
        let dir = open_or_create_dir(&utf8_root(&temp)).expect("open");
        assert_eq!(read_optional(&dir, "absent.json").expect("read"), None);
    }

    #[test]
    fn replace_overwrites_and_leaves_no_partial_file() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8_root(&temp);
        let dir = open_or_create_dir(&root).expect("open");
        replace_file(&dir, "slot.json", b"first").expect("first write");
        replace_file(&dir, "slot.json", b"second").expect("second write");
        assert_eq!(
            read_optional(&dir, "slot.json").expect("read").as_deref(),
            Some("second")
        );
        assert!(!root.join("slot.json.partial").as_std_path().exists());
    }

    #[test]
    fn removing_a_missing_file_is_ok() {
        let temp = TempDir::new().expect("temp dir");
        let dir = open_or_create_dir(&utf8_root(&temp)).expect("open");
        remove_if_exists(&dir, "absent.json").expect("remove");
    }
}
