use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::VerifyError;
use crate::trace::TraceLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// The canonical file already existed and was left alone.
    Reused,
    /// The canonical file was written with this many lines.
    Generated(usize),
}

/// Make sure the canonical rendering of `reference` exists at `canonical`.
///
/// Existence alone marks the cache valid. Output goes to a sibling
/// `.partial` file first and is renamed into place only once every line
/// converted, so a failed run never leaves a trusted cache behind.
pub fn ensure_canonical_reference(reference: &Path, canonical: &Path) -> Result<Materialized, VerifyError> {
    if canonical.exists() {
        info!("canonical reference {} already exists", canonical.display());
        return Ok(Materialized::Reused);
    }

    info!("creating canonical reference {} from {}", canonical.display(), reference.display());
    let partial = partial_path(canonical);
    let count = match convert(reference, &partial) {
        Ok(count) => count,
        Err(e) => {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
    };
    fs::rename(&partial, canonical).map_err(|e| VerifyError::io(canonical, e))?;

    info!("wrote {} canonical reference lines", count);
    Ok(Materialized::Generated(count))
}

fn partial_path(canonical: &Path) -> PathBuf {
    let mut name = canonical.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn convert(reference: &Path, out: &Path) -> Result<usize, VerifyError> {
    let input = File::open(reference).map_err(|e| VerifyError::io(reference, e))?;
    let output = File::create(out).map_err(|e| VerifyError::io(out, e))?;
    let mut writer = BufWriter::new(output);

    let mut count = 0;
    for (i, line) in BufReader::new(input).lines().enumerate() {
        let line = line.map_err(|e| VerifyError::io(reference, e))?;
        let trace = TraceLine::from_reference_line(&line)
            .map_err(|source| VerifyError::Extract { line: i + 1, source })?;
        writeln!(writer, "{}", trace).map_err(|e| VerifyError::io(out, e))?;
        count += 1;
    }
    writer.flush().map_err(|e| VerifyError::io(out, e))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::trace::reference::Register;

    const REFERENCE: &str = "\
C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
C5F5  A2 00     LDX #$00                        A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 30 CYC:10
C5F7  86 00     STX $00 = 00                    A:00 X:00 Y:00 P:26 SP:FD PPU:  0, 36 CYC:12
";

    const CANONICAL: &str = "\
C000 JMP  4C  a: 00  x: 00  y: 00  sp: FD  p: 24  cyc:     7
C5F5 LDX  A2  a: 00  x: 00  y: 00  sp: FD  p: 24  cyc:    10
C5F7 STX  86  a: 00  x: 00  y: 00  sp: FD  p: 26  cyc:    12
";

    #[test]
    fn test_generates_canonical_file() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("nestest.log");
        let canonical = dir.path().join("nestest_formatted.log");
        fs::write(&reference, REFERENCE).unwrap();

        let result = ensure_canonical_reference(&reference, &canonical).unwrap();
        assert_eq!(result, Materialized::Generated(3));
        assert_eq!(fs::read_to_string(&canonical).unwrap(), CANONICAL);
    }

    #[test]
    fn test_second_call_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("nestest.log");
        let canonical = dir.path().join("nestest_formatted.log");
        fs::write(&reference, REFERENCE).unwrap();

        ensure_canonical_reference(&reference, &canonical).unwrap();
        // Changing the source must not trigger regeneration.
        fs::write(&reference, "not a trace line\n").unwrap();
        let result = ensure_canonical_reference(&reference, &canonical).unwrap();
        assert_eq!(result, Materialized::Reused);
        assert_eq!(fs::read_to_string(&canonical).unwrap(), CANONICAL);
    }

    #[test]
    fn test_existing_file_is_trusted_without_reference() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("nestest_formatted.log");
        fs::write(&canonical, "cached\n").unwrap();

        let result =
            ensure_canonical_reference(&dir.path().join("missing.log"), &canonical).unwrap();
        assert_eq!(result, Materialized::Reused);
    }

    #[test]
    fn test_bad_line_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("nestest.log");
        let canonical = dir.path().join("nestest_formatted.log");
        let broken = REFERENCE.replace("X:00 Y:00 P:26", "X:00 P:26");
        fs::write(&reference, broken).unwrap();

        let err = ensure_canonical_reference(&reference, &canonical).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Extract {
                line: 3,
                source: ExtractError::MissingRegister(Register::Y)
            }
        ));
        assert!(!canonical.exists());
        assert!(!partial_path(&canonical).exists());
    }

    #[test]
    fn test_missing_reference() {
        let dir = tempfile::tempdir().unwrap();
        let err = ensure_canonical_reference(
            &dir.path().join("missing.log"),
            &dir.path().join("out.log"),
        )
        .unwrap_err();
        assert!(matches!(err, VerifyError::Io { .. }));
    }
}
