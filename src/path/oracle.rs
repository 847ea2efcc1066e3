use std::collections::HashMap;
use std::fs;

use log::debug;

/// What a filesystem probe found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Symlink,
    Directory,
}

/// Filesystem questions the pipeline needs answered.
///
/// The pipeline never touches the filesystem directly; everything goes
/// through this trait so tests can substitute a fixed table.
pub trait PathOracle {
    /// Probe `path` without following a final symlink.
    fn entry(&self, path: &str) -> Option<EntryKind>;

    /// Long-name form of an existing `path`, or `None` if it cannot be
    /// resolved (missing, access denied, unsupported platform).
    fn long_name(&self, path: &str) -> Option<String>;
}

/// Oracle backed by the real filesystem and the OS long-name facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeOracle;

impl PathOracle for NativeOracle {
    fn entry(&self, path: &str) -> Option<EntryKind> {
        let meta = fs::symlink_metadata(path).ok()?;
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            Some(EntryKind::Symlink)
        } else if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else {
            Some(EntryKind::File)
        }
    }

    fn long_name(&self, path: &str) -> Option<String> {
        let resolved = native_long_name(path);
        if resolved.is_none() {
            debug!("long name lookup failed path={path}");
        }
        resolved
    }
}

#[cfg(windows)]
fn native_long_name(path: &str) -> Option<String> {
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::GetLongPathNameW;

    let wide: Vec<u16> = path.encode_utf16().chain(std::iter::once(0)).collect();
    // First call reports the required buffer size including the terminator.
    let needed = unsafe { GetLongPathNameW(PCWSTR(wide.as_ptr()), None) };
    if needed == 0 {
        return None;
    }
    let mut buf = vec![0u16; needed as usize];
    let written = unsafe { GetLongPathNameW(PCWSTR(wide.as_ptr()), Some(&mut buf)) };
    if written == 0 || written as usize >= buf.len() {
        return None;
    }
    buf.truncate(written as usize);
    Some(String::from_utf16_lossy(&buf))
}

#[cfg(not(windows))]
fn native_long_name(_path: &str) -> Option<String> {
    None
}

/// In-memory oracle with a fixed set of entries and a short-to-long table.
///
/// Lookups are case-insensitive, like the Windows filesystem.
#[derive(Debug, Default, Clone)]
pub struct TableOracle {
    entries: HashMap<String, EntryKind>,
    long_names: HashMap<String, String>,
}

impl TableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, path: &str, kind: EntryKind) -> Self {
        self.entries.insert(table_key(path), kind);
        self
    }

    pub fn with_file(self, path: &str) -> Self {
        self.with_entry(path, EntryKind::File)
    }

    /// Register `long` as the long form of `short`. Both must be full paths.
    pub fn with_long_name(mut self, short: &str, long: &str) -> Self {
        self.long_names.insert(table_key(short), long.to_string());
        self
    }
}

impl PathOracle for TableOracle {
    fn entry(&self, path: &str) -> Option<EntryKind> {
        self.entries.get(&table_key(path)).copied()
    }

    fn long_name(&self, path: &str) -> Option<String> {
        self.long_names.get(&table_key(path)).cloned()
    }
}

fn table_key(path: &str) -> String {
    path.replace('/', "\\").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn native_entry_kinds() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("run.sh");
        std::fs::write(&file, "#!/bin/sh\n").unwrap();

        let oracle = NativeOracle;
        assert_eq!(oracle.entry(&file.display().to_string()), Some(EntryKind::File));
        assert_eq!(
            oracle.entry(&dir.path().display().to_string()),
            Some(EntryKind::Directory)
        );
        assert_eq!(oracle.entry(&dir.path().join("missing").display().to_string()), None);
    }

    #[cfg(unix)]
    #[test]
    fn native_entry_reports_symlink() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.sh");
        let link = dir.path().join("link.sh");
        std::fs::write(&target, "").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();
        assert_eq!(
            NativeOracle.entry(&link.display().to_string()),
            Some(EntryKind::Symlink)
        );
    }

    #[test]
    fn table_lookups_ignore_case_and_separator() {
        let oracle = TableOracle::new()
            .with_file(r"C:\Tools\run.sh")
            .with_long_name(r"C:\PROGRA~1", r"C:\Program Files");
        assert_eq!(oracle.entry("c:/tools/RUN.sh"), Some(EntryKind::File));
        assert_eq!(oracle.entry(r"C:\Tools"), None);
        assert_eq!(
            oracle.long_name(r"c:\progra~1").as_deref(),
            Some(r"C:\Program Files")
        );
    }
}
