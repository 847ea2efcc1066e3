use log::debug;

use crate::error::{ErrorKind, ScriptError, ScriptResult};

use super::classify::{parse_windows_path, WindowsRoot};
use super::oracle::PathOracle;

pub const DEFAULT_CYGDRIVE: &str = "/cygdrive";

/// Rewrite a Windows path into the POSIX form the Cygwin shell understands.
///
/// Short (8.3) segments are expanded first when `exists` is set; a segment
/// whose long form cannot be resolved is kept as is. Fails only when `path`
/// is not a drive-letter or UNC path at all.
pub fn translate(
    path: &str,
    exists: bool,
    cygdrive: &str,
    oracle: &dyn PathOracle,
) -> ScriptResult<String> {
    let expanded = if exists {
        expand_short_segments(path, oracle)?
    } else {
        path.to_string()
    };
    let parsed = parse_windows_path(&expanded).ok_or_else(|| not_a_windows_path(&expanded))?;
    let rest = parsed.rest.replace('\\', "/");
    let posix = match parsed.root {
        WindowsRoot::Drive(letter) => {
            let prefix = cygdrive.trim_end_matches('/');
            format!("{prefix}/{}{rest}", letter.to_ascii_lowercase())
        }
        WindowsRoot::Unc { server, share } => format!("//{server}/{share}{rest}"),
    };
    debug!("translate path={path:?} posix={posix:?}");
    Ok(posix)
}

fn not_a_windows_path(path: &str) -> ScriptError {
    ScriptError::new(
        ErrorKind::Classification,
        format!("not a Windows path: {path}"),
    )
    .with_context("only drive-letter and UNC paths can be translated")
}

fn expand_short_segments(path: &str, oracle: &dyn PathOracle) -> ScriptResult<String> {
    let parsed = parse_windows_path(path).ok_or_else(|| not_a_windows_path(path))?;
    let root = &path[..path.len() - parsed.rest.len()];
    if parsed.rest.is_empty() {
        return Ok(path.to_string());
    }

    let mut out = root.to_string();
    // `rest` starts with a separator, so the first split item is empty.
    for segment in parsed.rest[1..].split(['\\', '/']) {
        out.push('\\');
        if !is_short_name(segment) {
            out.push_str(segment);
            continue;
        }
        let prefix = format!("{out}{segment}");
        match oracle.long_name(&prefix).as_deref().and_then(last_component) {
            Some(long) => out.push_str(long),
            None => {
                debug!("short name kept segment={segment:?} prefix={prefix:?}");
                out.push_str(segment);
            }
        }
    }
    Ok(out)
}

fn last_component(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches(['\\', '/']);
    let name = trimmed.rsplit(['\\', '/']).next()?;
    if name.is_empty() || name.ends_with(':') {
        None
    } else {
        Some(name)
    }
}

/// True for 8.3 names carrying a numeric tail, like `PROGRA~1` or `MYSCRI~2.SH`.
pub fn is_short_name(segment: &str) -> bool {
    let (base, ext) = match segment.rsplit_once('.') {
        Some((base, ext)) => (base, ext),
        None => (segment, ""),
    };
    if base.is_empty() || base.len() > 8 || ext.len() > 3 {
        return false;
    }
    match base.rfind('~') {
        Some(idx) => {
            let tail = &base[idx + 1..];
            idx > 0 && !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}
