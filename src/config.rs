use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{ErrorKind, ScriptError, ScriptResult};
use crate::path::DEFAULT_CYGDRIVE;

pub const RC_FILE: &str = ".cygscriptrc";
pub const ENV_ROOT: &str = "CYGSCRIPT_ROOT";
pub const ENV_SHELL: &str = "CYGSCRIPT_SHELL";
pub const ENV_CYGDRIVE: &str = "CYGSCRIPT_CYGDRIVE";

#[cfg(windows)]
pub const DEFAULT_SHELL: &str = r"bin\sh.exe";
#[cfg(not(windows))]
pub const DEFAULT_SHELL: &str = "bin/sh";

#[cfg(windows)]
const FALLBACK_ROOTS: &[&str] = &[r"C:\cygwin64", r"C:\cygwin"];
#[cfg(not(windows))]
const FALLBACK_ROOTS: &[&str] = &["/"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Shell installation root; discovered when unset.
    pub root: Option<PathBuf>,
    /// Shell executable, relative to the root or absolute.
    pub shell: String,
    pub cygdrive: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            shell: DEFAULT_SHELL.to_string(),
            cygdrive: DEFAULT_CYGDRIVE.to_string(),
        }
    }
}

/// Defaults, then the rc file in the home directory, then environment.
pub fn load_config() -> io::Result<Config> {
    let mut config = Config::default();
    if let Some(home) = home_dir() {
        let path = home.join(RC_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => {
                for err in parse_config(&content, &mut config) {
                    eprintln!("{}:{err}", path.display());
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
    }
    apply_env(&mut config);
    debug!("config loaded {config:?}");
    Ok(config)
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Apply `key=value` lines to `config`, returning one message per bad line.
pub fn parse_config(content: &str, config: &mut Config) -> Vec<String> {
    let mut errors = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            errors.push(format!("{}: missing '='", idx + 1));
            continue;
        };
        let value = strip_quotes(value.trim());
        match key.trim().to_ascii_lowercase().as_str() {
            "root" => config.root = non_empty(value).map(PathBuf::from),
            "shell" => {
                if let Some(shell) = non_empty(value) {
                    config.shell = shell.to_string();
                }
            }
            "cygdrive" => config.cygdrive = value.to_string(),
            other => errors.push(format!("{}: unknown key '{other}'", idx + 1)),
        }
    }
    errors
}

pub fn apply_env(config: &mut Config) {
    if let Some(root) = env::var_os(ENV_ROOT).filter(|v| !v.is_empty()) {
        config.root = Some(PathBuf::from(root));
    }
    if let Ok(shell) = env::var(ENV_SHELL) {
        if let Some(shell) = non_empty(shell.trim()) {
            config.shell = shell.to_string();
        }
    }
    if let Ok(cygdrive) = env::var(ENV_CYGDRIVE) {
        config.cygdrive = cygdrive.trim().to_string();
    }
}

/// Installation root: configured, next to `exe`, or a well-known location.
pub fn resolve_root(config: &Config, exe: Option<&Path>) -> ScriptResult<PathBuf> {
    if let Some(root) = &config.root {
        return Ok(root.clone());
    }
    let has_shell = |dir: &Path| dir.join(&config.shell).is_file();
    if let Some(dir) = exe.and_then(Path::parent) {
        if let Some(found) = dir.ancestors().find(|dir| has_shell(dir)) {
            debug!("root discovered next to executable root={}", found.display());
            return Ok(found.to_path_buf());
        }
    }
    FALLBACK_ROOTS
        .iter()
        .map(PathBuf::from)
        .find(|dir| has_shell(dir))
        .ok_or_else(|| {
            ScriptError::new(
                ErrorKind::Config,
                format!("cannot find shell installation containing {}", config.shell),
            )
            .with_context(format!("set {ENV_ROOT} or 'root=' in ~/{RC_FILE}"))
        })
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn strip_quotes(input: &str) -> &str {
    let bytes = input.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &input[1..bytes.len() - 1];
        }
    }
    input
}
