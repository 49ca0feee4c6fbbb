use log::info;

use crate::compare::{compare_files, Outcome};
use crate::config::Config;
use crate::convert::ensure_canonical_reference;
use crate::error::VerifyError;
use crate::launch::run_emulator;
use crate::trace::emulator::normalize_file;

/// Full verification run. Each stage finishes with its files before the
/// next one opens them.
pub fn run(config: &Config) -> Result<Outcome, VerifyError> {
    ensure_canonical_reference(&config.reference_log, &config.canonical_reference)?;

    run_emulator(&config.emulator, &config.rom, &config.raw_trace)?;
    normalize_file(&config.raw_trace, &config.canonical_trace)?;

    let outcome = compare_files(
        &config.canonical_trace,
        &config.raw_trace,
        &config.canonical_reference,
    )?;
    if let Outcome::Matched { lines } = outcome {
        info!("all {} lines match", lines);
    }
    Ok(outcome)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    const REFERENCE: &str = "\
C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
C5F5  A2 00     LDX #$00                        A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 30 CYC:10
C5F7  86 00     STX $00 = 00                    A:00 X:00 Y:00 P:26 SP:FD PPU:  0, 36 CYC:12
";

    const GOOD_TRACE: &str = "\
C000 JMP  4C  a: 00  x: 00  y: 00  sp: FD  flags: nv-bdIzc(24)  cycles:     7
C5F5 LDX  A2  a: 00  x: 00  y: 00  sp: FD  flags: nv-bdIzc(24)  cycles:    10
C5F7 STX  86  a: 00  x: 00  y: 00  sp: FD  flags: nv-bdIZc(26)  cycles:    12
";

    // `sh` plays the emulator; the ROM is a script that prints the trace to stderr.
    fn setup(dir: &Path, trace: &str) -> Config {
        let reference = dir.join("nestest.log");
        fs::write(&reference, REFERENCE).unwrap();
        let trace_file = dir.join("trace.txt");
        fs::write(&trace_file, trace).unwrap();
        let rom = dir.join("nestest.sh");
        fs::write(&rom, format!("cat '{}' >&2\n", trace_file.display())).unwrap();
        Config::with_work_dir(PathBuf::from("sh"), rom, reference, dir)
    }

    #[test]
    fn test_matching_run_passes() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), GOOD_TRACE);
        assert_eq!(run(&config).unwrap(), Outcome::Matched { lines: 3 });
        assert!(config.canonical_reference.exists());
        assert!(config.canonical_trace.exists());
    }

    #[test]
    fn test_wrong_register_diverges() {
        let dir = tempfile::tempdir().unwrap();
        let trace = GOOD_TRACE.replacen("A2  a: 00  x: 00", "A2  a: 00  x: 01", 1);
        let config = setup(dir.path(), &trace);

        let Outcome::Diverged(d) = run(&config).unwrap() else {
            panic!("expected divergence");
        };
        assert_eq!(d.index, 1);
        assert_eq!(
            d.emulator.as_deref(),
            Some("C5F5 LDX  A2  a: 00  x: 01  y: 00  sp: FD  p: 24  cyc:    10")
        );
        assert_eq!(d.history.len(), 1);
        assert!(d.raw.unwrap().contains("flags: nv-bdIzc(24)"));
    }

    #[test]
    fn test_truncated_trace_diverges() {
        let dir = tempfile::tempdir().unwrap();
        let trace: String = GOOD_TRACE.lines().take(2).map(|l| format!("{}\n", l)).collect();
        let config = setup(dir.path(), &trace);

        let Outcome::Diverged(d) = run(&config).unwrap() else {
            panic!("expected divergence");
        };
        assert_eq!(d.index, 2);
        assert_eq!(d.emulator, None);
    }

    #[test]
    fn test_broken_reference_stops_before_emulator() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), GOOD_TRACE);
        fs::write(&config.reference_log, "C000  4C F5 C5\n").unwrap();

        let err = run(&config).unwrap_err();
        assert!(matches!(err, VerifyError::Extract { line: 1, .. }));
        assert!(!config.raw_trace.exists());
    }
}
