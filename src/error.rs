use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use crate::trace::reference::Register;

/// Failure to pull a field out of one reference trace line.
#[derive(Debug)]
pub enum ExtractError {
    MissingMnemonicToken,
    MissingRegister(Register),
    MissingStackPointer,
    MissingField(&'static str),
    MalformedHex { field: &'static str, token: String },
    MalformedCycleCount { token: String, source: ParseIntError },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::MissingMnemonicToken => write!(f, "couldn't find mnemonic token"),
            ExtractError::MissingRegister(reg) => write!(f, "couldn't find register {}", reg),
            ExtractError::MissingStackPointer => write!(f, "couldn't find stack pointer (SP:)"),
            ExtractError::MissingField(name) => write!(f, "line has no {} token", name),
            ExtractError::MalformedHex { field, token } => {
                write!(f, "{} token '{}' is not valid hexadecimal", field, token)
            }
            ExtractError::MalformedCycleCount { token, source } => {
                write!(f, "cycle count token '{}' is malformed: {}", token, source)
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::MalformedCycleCount { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    TooManyArguments(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TooManyArguments(n) => {
                write!(f, "expected at most 4 arguments, got {}", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum VerifyError {
    /// `line` is 1-based within the reference log.
    Extract { line: usize, source: ExtractError },
    Io { path: PathBuf, source: io::Error },
    Spawn { program: PathBuf, source: io::Error },
    Config(ConfigError),
}

impl VerifyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        VerifyError::Io { path: path.into(), source }
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Extract { line, source } => {
                write!(f, "reference log line {}: {}", line, source)
            }
            VerifyError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            VerifyError::Spawn { program, source } => {
                write!(f, "failed to launch '{}': {}", program.display(), source)
            }
            VerifyError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Extract { source, .. } => Some(source),
            VerifyError::Io { source, .. } | VerifyError::Spawn { source, .. } => Some(source),
            VerifyError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for VerifyError {
    fn from(e: ConfigError) -> Self {
        VerifyError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_register_names_the_register() {
        let err = ExtractError::MissingRegister(Register::Y);
        assert_eq!(err.to_string(), "couldn't find register Y");
    }

    #[test]
    fn test_extract_error_carries_line_number() {
        let err = VerifyError::Extract {
            line: 42,
            source: ExtractError::MissingStackPointer,
        };
        assert_eq!(
            err.to_string(),
            "reference log line 42: couldn't find stack pointer (SP:)"
        );
    }

    #[test]
    fn test_cycle_count_error_exposes_parse_source() {
        let source = "x1".parse::<u64>().unwrap_err();
        let err = ExtractError::MalformedCycleCount { token: "CYC:x1".into(), source };
        assert!(std::error::Error::source(&err).is_some());
    }
}
