use std::ffi::OsStr;
use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Failures surfaced by the `models` and `chat` commands. Each one is terminal
/// for the invocation and maps to exactly one exit code.
#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("{program} CLI not found on PATH")]
    ToolNotFound { program: String },

    #[error("failed to retrieve models: {}", .stderr.trim_end())]
    ListFailed { stderr: String },

    #[error("model execution failed (exit code {code})\n{}", .stderr.trim_end())]
    RunFailed { code: i32, stderr: String },

    #[error("unexpected error: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected error: output was not valid UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),
}

impl OllamaError {
    /// Classifies a spawn failure. Only a missing binary gets its own variant;
    /// everything else is unexpected.
    pub fn from_spawn(program: &OsStr, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            OllamaError::ToolNotFound {
                program: program.to_string_lossy().into_owned(),
            }
        } else {
            OllamaError::Io(err)
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            OllamaError::RunFailed { code, .. } => *code,
            _ => 1,
        }
    }

    /// A failed run with nothing on stderr exits silently with the child's code.
    pub fn should_report(&self) -> bool {
        match self {
            OllamaError::RunFailed { stderr, .. } => !stderr.is_empty(),
            _ => true,
        }
    }
}
