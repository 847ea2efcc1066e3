//! Windows path handling for script arguments.
//!
//! - `classify` decides, by syntax plus one existence probe, whether a token is a path.
//! - `translate` expands short names and rewrites the path into cygdrive/UNC form.
//! - `oracle` abstracts the filesystem so both can run against a fixed table.

mod classify;
mod oracle;
mod translate;

pub use classify::{
    classify, parse_windows_path, PathClassification, PathKind, WindowsPath, WindowsRoot,
};
pub use oracle::{EntryKind, NativeOracle, PathOracle, TableOracle};
pub use translate::{is_short_name, translate, DEFAULT_CYGDRIVE};

/// Translate `token` if it classifies as a Windows path, otherwise pass it through.
pub fn translate_argument(
    token: &str,
    must_exist: bool,
    cygdrive: &str,
    oracle: &dyn PathOracle,
) -> crate::error::ScriptResult<String> {
    let classification = classify(token, must_exist, oracle);
    if !classification.is_windows_path() {
        return Ok(token.to_string());
    }
    translate(token, classification.exists, cygdrive, oracle)
}
