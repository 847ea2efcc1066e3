//! Error types and reporting for the launcher.
//!
//! Functions return `ScriptError` instead of bare strings. Each error carries:
//! - Error kind (classification, launch, config, usage)
//! - Human-readable message
//! - Optional context about which operation failed
//! - Optional OS error code, so a launch failure can be diagnosed

use std::fmt;
use std::io;

// Our own failure codes sit above the range a shell hands back for its own
// failures (126, 127, and 128 + signal up to 192), so they never collide
// with a script's exit status except when a script picks them deliberately.

/// Exit code when the shell binary could not be found.
pub const EXIT_NOT_FOUND: i32 = 253;
/// Exit code when the OS refused to create the shell process.
pub const EXIT_PERMISSION_DENIED: i32 = 252;
/// Exit code for every other failure of this program.
pub const EXIT_FAILURE: i32 = 254;

/// Categorized error types for better diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A token reached the translator without being a Windows path
    Classification,
    /// The shell process could not be created
    Launch,
    /// Error loading configuration or locating the shell installation
    Config,
    /// Invalid invocation of the pipeline
    Usage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Classification => write!(f, "Classification error"),
            ErrorKind::Launch => write!(f, "Launch error"),
            ErrorKind::Config => write!(f, "Config error"),
            ErrorKind::Usage => write!(f, "Usage error"),
        }
    }
}

/// Rich error type with context information
#[derive(Debug, Clone)]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub message: String,
    /// Additional context explaining what was being processed
    pub context: Option<String>,
    /// Raw OS error code reported by the failing call
    pub os_code: Option<i32>,
}

impl ScriptError {
    /// Create a new error with just the kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ScriptError {
            kind,
            message: message.into(),
            context: None,
            os_code: None,
        }
    }

    /// Build a launch error from an OS error, keeping its numeric code
    pub fn launch(call: &str, err: &io::Error) -> Self {
        let mut out = ScriptError::new(ErrorKind::Launch, format!("{call}: {err}"));
        out.os_code = err.raw_os_error();
        if out.os_code.is_none() {
            out.message = format!("{call}: {err} ({:?})", err.kind());
        }
        out
    }

    /// Add context string (e.g., "while resolving the shell executable")
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach the OS error code of the failing call
    pub fn with_os_code(mut self, code: i32) -> Self {
        self.os_code = Some(code);
        self
    }

    /// Exit code this program should terminate with when reporting the error
    pub fn exit_code(&self) -> i32 {
        if self.kind != ErrorKind::Launch {
            return EXIT_FAILURE;
        }
        match self.os_code.map(io::Error::from_raw_os_error).map(|e| e.kind()) {
            Some(io::ErrorKind::NotFound) => EXIT_NOT_FOUND,
            Some(io::ErrorKind::PermissionDenied) => EXIT_PERMISSION_DENIED,
            _ => EXIT_FAILURE,
        }
    }

    /// Simplified display without the kind prefix, as shown to the user
    pub fn display_simple(&self) -> String {
        let mut msg = self.message.clone();
        if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }
        msg
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.display_simple())
    }
}

impl std::error::Error for ScriptError {}

/// Convenience type alias for Results with ScriptError
pub type ScriptResult<T> = Result<T, ScriptError>;
