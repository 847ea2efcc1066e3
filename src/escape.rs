//! Quoting for the two command-line consumers a launch goes through.

use std::iter;

/// Which parser will split the escaped text back into arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `CommandLineToArgvW` / MSVC runtime argument splitting.
    ///
    /// An embedded quote is written as `\"`. Both the MSVC runtime and the
    /// Cygwin runtime's own command-line splitter read that form, while a
    /// doubled `""` inside a quoted run is interpreted differently between
    /// runtime versions.
    Windows,
    /// POSIX shell word splitting.
    Posix,
}

/// Escape `value` so the consumer of `grammar` reads it back as one argument.
pub fn escape(value: &str, grammar: Grammar) -> String {
    match grammar {
        Grammar::Windows => escape_windows(value),
        Grammar::Posix => escape_posix(value),
    }
}

fn escape_windows(value: &str) -> String {
    if !value.is_empty() && !value.contains([' ', '\t', '\n', '\x0b', '"']) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut backslashes = 0;
    for ch in value.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                // Backslashes before a quote are literal only when doubled.
                out.extend(iter::repeat('\\').take(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.extend(iter::repeat('\\').take(backslashes));
                out.push(ch);
                backslashes = 0;
            }
        }
    }
    // Trailing backslashes would otherwise escape the closing quote.
    out.extend(iter::repeat('\\').take(backslashes * 2));
    out.push('"');
    out
}

fn escape_posix(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    out.push_str(&value.replace('\'', r"'\''"));
    out.push('\'');
    out
}

/// POSIX-escape every argument once and join them with single spaces.
pub fn join_posix<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| escape(arg.as_ref(), Grammar::Posix))
        .collect::<Vec<_>>()
        .join(" ")
}
