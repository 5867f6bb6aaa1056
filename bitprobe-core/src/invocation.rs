//! Construction of the target command for one fuzz input.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::encoding::encode_bits;

/// Redirection suffix shown in the echoed command line: error output is
/// observed, normal output is discarded.
pub const SHELL_REDIRECT_SUFFIX: &str = " 2>&1 1>/dev/null";

/// One execution of the target program for a single input.
///
/// The encoded input is always the last argv element. Nothing here is ever
/// handed to a shell; [`Invocation::shell_line`] exists for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    leading_args: Vec<String>,
    encoded: String,
}

impl Invocation {
    /// Build the invocation for `data`.
    ///
    /// # Arguments
    /// - `program`: path to the executable under test
    /// - `leading_args`: fixed arguments placed before the encoded input
    /// - `data`: raw fuzz input, encoded with [`encode_bits`]
    #[must_use]
    pub fn new(program: &Path, leading_args: &[String], data: &[u8]) -> Self {
        Self {
            program: program.to_owned(),
            leading_args: leading_args.to_vec(),
            encoded: encode_bits(data),
        }
    }

    /// Path of the executable.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument vector after the program name.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.leading_args
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.encoded.as_str()))
    }

    /// The encoded input argument.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Shell-equivalent rendering of this invocation.
    ///
    /// The encoded input is appended directly after the program (or the last
    /// leading argument) with no separator, followed by
    /// [`SHELL_REDIRECT_SUFFIX`].
    #[must_use]
    pub fn shell_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.leading_args {
            line.push(' ');
            line.push_str(arg);
        }
        line.push_str(&self.encoded);
        line.push_str(SHELL_REDIRECT_SUFFIX);
        line
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shell_line())
    }
}
