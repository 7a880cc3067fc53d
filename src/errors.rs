//! Application error model with exit-code mapping
//!
//! Defines a typed error hierarchy using `thiserror` for internal error handling,
//! and maps each variant to the `<sysexits.h>` exit code the shell observes.
//! Only usage and configuration problems get a clean one-line message; other
//! faults keep their debug representation as the diagnostic trail.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Exit code for command-line usage errors, from `<sysexits.h>`
pub const EX_USAGE: i32 = 64;

/// Exit code for configuration errors, from `<sysexits.h>`
pub const EX_CONFIG: i32 = 78;

/// Application error type
///
/// Covers all error cases the launcher may encounter. Each variant maps to a
/// process exit code via [`AppError::exit_code`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid command-line usage (no search terms given)
    #[error("{0}")]
    Usage(String),
    /// Configuration problem (missing or malformed notmuch config item)
    #[error("{0}")]
    Config(String),
    /// An external command could not be started
    #[error("failed to run {command}: {source}")]
    CommandSpawn {
        /// Executable that failed to start
        command: String,
        /// Underlying spawn error
        #[source]
        source: io::Error,
    },
    /// An external command exited unsuccessfully
    #[error("`{command}` exited with {status}")]
    CommandFailed {
        /// Full command line that failed
        command: String,
        /// Exit status reported by the operating system
        status: ExitStatus,
    },
    /// An external command produced undecodable output
    #[error("`{command}` produced non-UTF-8 output")]
    CommandOutput {
        /// Full command line whose output could not be decoded
        command: String,
    },
    /// HOME is required to resolve the mail root
    #[error("HOME is not set; cannot resolve the mail root")]
    HomeNotSet,
    /// Internal error (unexpected failure, external crate error)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Convenience constructor for `Usage`
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Convenience constructor for `Config`
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Convert to a process exit code
    ///
    /// Maps each `AppError` variant to the exit code that `main` passes to
    /// [`std::process::exit`].
    ///
    /// # Mappings
    ///
    /// - `Usage` → 64 (`EX_USAGE`)
    /// - `Config` → 78 (`EX_CONFIG`)
    /// - everything else → 1, the generic failure code for propagated faults
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => EX_USAGE,
            Self::Config(_) => EX_CONFIG,
            _ => 1,
        }
    }
}

/// Type alias for fallible return values
///
/// Use this for all internal functions that can fail. Provides a consistent
/// error type throughout the codebase.
pub type AppResult<T> = Result<T, AppError>;
