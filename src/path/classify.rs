use log::debug;

use super::oracle::{EntryKind, PathOracle};

const VERBATIM_PREFIX: &str = r"\\?\";
const VERBATIM_UNC_PREFIX: &str = r"\\?\UNC\";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    WindowsPath,
    NotAPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathClassification {
    pub kind: PathKind,
    /// Only meaningful for `WindowsPath`; gates short-name expansion.
    pub exists: bool,
}

impl PathClassification {
    pub fn not_a_path() -> Self {
        Self {
            kind: PathKind::NotAPath,
            exists: false,
        }
    }

    pub fn is_windows_path(&self) -> bool {
        self.kind == PathKind::WindowsPath
    }
}

/// Root component of a Windows path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowsRoot<'a> {
    Drive(char),
    Unc { server: &'a str, share: &'a str },
}

/// Syntactic split of a Windows path into its root and the remainder.
///
/// `rest` starts at the separator following the root (or is empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowsPath<'a> {
    pub root: WindowsRoot<'a>,
    pub rest: &'a str,
}

/// Split `token` if it is a drive-letter or UNC path, syntax only.
pub fn parse_windows_path(token: &str) -> Option<WindowsPath<'_>> {
    if let Some(rest) = token.strip_prefix(VERBATIM_UNC_PREFIX) {
        return parse_unc_body(rest);
    }
    if let Some(rest) = token.strip_prefix(VERBATIM_PREFIX) {
        return parse_drive(rest);
    }
    if let Some(rest) = token.strip_prefix(r"\\") {
        return parse_unc_body(rest);
    }
    parse_drive(token)
}

fn parse_drive(token: &str) -> Option<WindowsPath<'_>> {
    let bytes = token.as_bytes();
    if bytes.len() < 3 || !bytes[0].is_ascii_alphabetic() || bytes[1] != b':' {
        return None;
    }
    if bytes[2] != b'\\' && bytes[2] != b'/' {
        return None;
    }
    Some(WindowsPath {
        root: WindowsRoot::Drive(bytes[0] as char),
        rest: &token[2..],
    })
}

fn parse_unc_body(body: &str) -> Option<WindowsPath<'_>> {
    let (server, after_server) = body.split_once('\\')?;
    if server.is_empty() || server == "?" || server == "." || server.contains('/') {
        return None;
    }
    let (share, rest) = match after_server.find('\\') {
        Some(idx) => (&after_server[..idx], &after_server[idx..]),
        None => (after_server, ""),
    };
    if share.is_empty() {
        return None;
    }
    Some(WindowsPath {
        root: WindowsRoot::Unc { server, share },
        rest,
    })
}

/// Decide whether `token` is a Windows path, probing the filesystem once.
///
/// With `must_exist`, a path-shaped token that is not an existing regular
/// file or symlink is reported as `NotAPath`.
pub fn classify(token: &str, must_exist: bool, oracle: &dyn PathOracle) -> PathClassification {
    if parse_windows_path(token).is_none() {
        return PathClassification::not_a_path();
    }
    let entry = oracle.entry(token);
    if must_exist && !matches!(entry, Some(EntryKind::File | EntryKind::Symlink)) {
        debug!("classify token={token:?} path-shaped but not an existing file");
        return PathClassification::not_a_path();
    }
    debug!("classify token={token:?} kind=windows exists={}", entry.is_some());
    PathClassification {
        kind: PathKind::WindowsPath,
        exists: entry.is_some(),
    }
}
