use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use log::{info, warn};

use crate::error::VerifyError;

/// Run the emulator on `rom` with its stderr captured into `raw_trace`, and
/// block until it exits. The trace is complete once this returns.
///
/// A non-zero exit is logged but not treated as an error: the trace decides
/// the verdict, not the emulator's status.
pub fn run_emulator(emulator: &Path, rom: &Path, raw_trace: &Path) -> Result<ExitStatus, VerifyError> {
    let trace = File::create(raw_trace).map_err(|e| VerifyError::io(raw_trace, e))?;

    info!("running {} {}", emulator.display(), rom.display());
    let status = Command::new(emulator)
        .arg(rom)
        .stdin(Stdio::null())
        .stderr(Stdio::from(trace))
        .status()
        .map_err(|source| VerifyError::Spawn {
            program: emulator.to_path_buf(),
            source,
        })?;

    if !status.success() {
        warn!("emulator exited with {}", status);
    }
    Ok(status)
}
