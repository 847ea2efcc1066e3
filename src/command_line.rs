use std::path::Path;

use log::debug;

use crate::error::{ErrorKind, ScriptError, ScriptResult};
use crate::escape::{escape, join_posix, Grammar};
use crate::path::{classify, parse_windows_path, translate, translate_argument, PathOracle};

#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

/// Flag telling the shell to run the next argument as a script body.
pub const SCRIPT_FLAG: &str = "-c";

/// Everything the builder reads besides the arguments themselves.
pub struct LaunchContext<'a> {
    /// Shell installation root in native form, e.g. `C:\cygwin64`.
    pub root: &'a Path,
    /// Shell executable, absolute or relative to `root`.
    pub shell: &'a str,
    pub cygdrive: &'a str,
    /// PATH inherited from this process.
    pub inherited_path: Option<&'a str>,
    pub oracle: &'a dyn PathOracle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Long path of the shell executable.
    pub program: String,
    /// Arguments after the program: the script flag and the payload.
    pub args: Vec<String>,
    /// Flat command line for `CreateProcessW`.
    pub command_line: String,
    /// Console title, cosmetic only.
    pub title: String,
    /// PATH value for the child.
    pub path_env: String,
}

/// Assemble the shell invocation for `script_path` and its arguments.
pub fn build(
    script_path: &str,
    remaining_args: &[String],
    ctx: &LaunchContext<'_>,
) -> ScriptResult<Invocation> {
    if script_path.is_empty() {
        return Err(ScriptError::new(ErrorKind::Usage, "no script given"));
    }

    let mut translated = Vec::with_capacity(remaining_args.len() + 1);
    translated.push(translate_script(script_path, ctx)?);
    for arg in remaining_args {
        translated.push(translate_argument(arg, false, ctx.cygdrive, ctx.oracle)?);
    }
    let payload = join_posix(&translated);

    let program = shell_long_path(ctx);
    let command_line = format!(
        "{} {SCRIPT_FLAG} {}",
        escape(&program, Grammar::Windows),
        escape(&payload, Grammar::Windows)
    );
    debug!("build program={program:?} payload={payload:?}");

    let bin_dir = ctx.root.join("bin").to_string_lossy().into_owned();
    Ok(Invocation {
        program,
        args: vec![SCRIPT_FLAG.to_string(), payload],
        command_line,
        title: script_title(&translated[0]),
        path_env: prepend_path(&bin_dir, ctx.inherited_path, PATH_SEPARATOR),
    })
}

/// The script must exist as a file; a Windows-shaped path that does not is
/// rejected rather than handed to the shell verbatim.
fn translate_script(script_path: &str, ctx: &LaunchContext<'_>) -> ScriptResult<String> {
    let classification = classify(script_path, true, ctx.oracle);
    if classification.is_windows_path() {
        return translate(script_path, classification.exists, ctx.cygdrive, ctx.oracle);
    }
    if parse_windows_path(script_path).is_some() {
        return Err(ScriptError::new(
            ErrorKind::Usage,
            format!("script not found: {script_path}"),
        ));
    }
    Ok(script_path.to_string())
}

fn shell_long_path(ctx: &LaunchContext<'_>) -> String {
    let shell = ctx.root.join(ctx.shell).to_string_lossy().into_owned();
    if ctx.oracle.entry(&shell).is_none() {
        // Launch reports the missing binary with its OS error.
        return shell;
    }
    ctx.oracle.long_name(&shell).unwrap_or(shell)
}

/// Base file name of `script_path` without its extension.
pub fn script_title(script_path: &str) -> String {
    let name = script_path
        .trim_end_matches(['\\', '/'])
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or_default();
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[..idx].to_string(),
        _ => name.to_string(),
    }
}

/// Put `dir` in front of `inherited` unless it is already listed.
pub fn prepend_path(dir: &str, inherited: Option<&str>, separator: char) -> String {
    let inherited = inherited.unwrap_or_default();
    if inherited.is_empty() {
        return dir.to_string();
    }
    let wanted = normalize_path_entry(dir);
    if inherited
        .split(separator)
        .any(|entry| normalize_path_entry(entry) == wanted)
    {
        return inherited.to_string();
    }
    format!("{dir}{separator}{inherited}")
}

fn normalize_path_entry(entry: &str) -> String {
    entry
        .trim()
        .trim_end_matches(['\\', '/'])
        .replace('/', "\\")
        .to_lowercase()
}
