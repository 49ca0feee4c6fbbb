use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const DEFAULT_EMULATOR: &str = "./build/src/nes-emulator";
const DEFAULT_ROM: &str = "./roms/nes-test-roms/other/nestest.nes";
const DEFAULT_REFERENCE: &str = "./roms/nes-test-roms/other/nestest.log";
const DEFAULT_WORK_DIR: &str = "./roms";

const CANONICAL_REFERENCE_NAME: &str = "nestest_formatted.log";
const RAW_TRACE_NAME: &str = "nes-emulator-raw.log";
const CANONICAL_TRACE_NAME: &str = "nes-emulator-final.log";

/// Where every file of a verification run lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub emulator: PathBuf,
    pub rom: PathBuf,
    pub reference_log: PathBuf,
    /// Cache; only regenerated when absent.
    pub canonical_reference: PathBuf,
    pub raw_trace: PathBuf,
    pub canonical_trace: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config::with_work_dir(
            PathBuf::from(DEFAULT_EMULATOR),
            PathBuf::from(DEFAULT_ROM),
            PathBuf::from(DEFAULT_REFERENCE),
            Path::new(DEFAULT_WORK_DIR),
        )
    }
}

impl Config {
    /// Derived files are placed in `work_dir` under their conventional names.
    pub fn with_work_dir(emulator: PathBuf, rom: PathBuf, reference_log: PathBuf, work_dir: &Path) -> Self {
        Config {
            emulator,
            rom,
            reference_log,
            canonical_reference: work_dir.join(CANONICAL_REFERENCE_NAME),
            raw_trace: work_dir.join(RAW_TRACE_NAME),
            canonical_trace: work_dir.join(CANONICAL_TRACE_NAME),
        }
    }

    /// Build from positional arguments (program name excluded):
    /// `[emulator] [rom] [reference_log] [work_dir]`. Missing ones keep their defaults.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        if args.len() > 4 {
            return Err(ConfigError::TooManyArguments(args.len()));
        }
        let arg = |i: usize, default: &str| PathBuf::from(args.get(i).map_or(default, String::as_str));

        Ok(Config::with_work_dir(
            arg(0, DEFAULT_EMULATOR),
            arg(1, DEFAULT_ROM),
            arg(2, DEFAULT_REFERENCE),
            &arg(3, DEFAULT_WORK_DIR),
        ))
    }
}
