//! Relabeling of the emulator's own debug trace into canonical lines.
//!
//! The emulator already prints fields in canonical order and width; only two
//! labels differ. A raw line such as
//! `C000 JMP  4C  a: 00  x: 00  y: 00  sp: FD  flags: nv-BdIzc(24)  cycles:     7`
//! becomes
//! `C000 JMP  4C  a: 00  x: 00  y: 00  sp: FD  p: 24  cyc:     7`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;

use log::info;
use regex::Regex;

use crate::error::VerifyError;

const RAW_CYCLE_LABEL: &str = "cycles";
const CANONICAL_CYCLE_LABEL: &str = "cyc";

static FLAGS_PATTERN: OnceLock<Regex> = OnceLock::new();

fn flags_pattern() -> &'static Regex {
    // Greedy on both sides: the compact value is the contents of the last
    // parenthesized group on the line.
    FLAGS_PATTERN.get_or_init(|| Regex::new(r"flags:.*\((.*)\)").unwrap())
}

/// Rewrite one raw emulator line. Everything but the two labels passes
/// through untouched.
pub fn normalize_line(raw: &str) -> String {
    let relabeled = raw.replace(RAW_CYCLE_LABEL, CANONICAL_CYCLE_LABEL);
    flags_pattern()
        .replace_all(&relabeled, "p: ${1}")
        .into_owned()
}

/// Normalize a whole raw trace file, one output line per input line.
/// Returns the number of lines written.
pub fn normalize_file(raw: &Path, out: &Path) -> Result<usize, VerifyError> {
    let input = File::open(raw).map_err(|e| VerifyError::io(raw, e))?;
    let output = File::create(out).map_err(|e| VerifyError::io(out, e))?;
    let mut writer = BufWriter::new(output);

    let mut count = 0;
    for line in BufReader::new(input).lines() {
        let line = line.map_err(|e| VerifyError::io(raw, e))?;
        writeln!(writer, "{}", normalize_line(&line)).map_err(|e| VerifyError::io(out, e))?;
        count += 1;
    }
    writer.flush().map_err(|e| VerifyError::io(out, e))?;

    info!("normalized {} emulator trace lines into {}", count, out.display());
    Ok(count)
}
