//! Run POSIX shell scripts from Windows as if they were native programs.
//!
//! The pipeline turns a Windows invocation (script path plus arguments) into
//! a Cygwin shell command line and runs it. Every step below the launcher is
//! a pure function of the arguments, the environment and a [`PathOracle`],
//! so it can be exercised without a Windows host.

pub mod command_line;
pub mod config;
pub mod error;
pub mod escape;
pub mod launcher;
pub mod path;

use std::ffi::OsString;

pub use command_line::{build, prepend_path, script_title, Invocation, LaunchContext};
pub use config::{load_config, resolve_root, Config};
pub use error::{ErrorKind, ScriptError, ScriptResult};
pub use escape::{escape, join_posix, Grammar};
pub use launcher::{launch, LaunchOutcome};
pub use path::{
    classify, translate, translate_argument, EntryKind, NativeOracle, PathClassification,
    PathKind, PathOracle, TableOracle,
};

/// Decode OS arguments to UTF-8, replacing unpaired surrogates.
pub fn decode_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Build the invocation for `args` (index 0 is the script).
pub fn prepare(args: &[String], ctx: &LaunchContext<'_>) -> ScriptResult<Invocation> {
    let Some((script, rest)) = args.split_first() else {
        return Err(ScriptError::new(ErrorKind::Usage, "no script given"));
    };
    build(script, rest, ctx)
}

/// Translate, launch and wait; returns the child's exit code.
pub fn run(args: &[String], ctx: &LaunchContext<'_>) -> LaunchOutcome {
    let invocation = prepare(args, ctx)?;
    launch(&invocation)
}

/// Fuzz helper for the escaping layer.
pub fn fuzz_escape_bytes(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    let _ = escape(&input, Grammar::Windows);
    let _ = join_posix(&[&*input, &*input]);
}

/// Fuzz helper for path classification and translation.
pub fn fuzz_translate_bytes(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    let oracle = TableOracle::new().with_file(&input);
    let _ = translate_argument(&input, true, path::DEFAULT_CYGDRIVE, &oracle);
    let _ = translate_argument(&input, false, "/", &oracle);
}
