//! Lock-step comparison of the canonical emulator trace against the canonical
//! reference trace.
//!
//! All three streams advance together. A stream that runs out yields `None`
//! for every later index, so a trace that stops early diverges at the first
//! index past its end instead of passing. The first divergence ends the scan.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::VerifyError;
use crate::history::HistoryBuffer;
use crate::trace::StatusFlags;

const ABSENT: &str = "<end of trace>";

#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Every index matched; `lines` is the length of the longest stream.
    Matched { lines: usize },
    Diverged(Divergence),
}

impl Outcome {
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Matched { .. })
    }
}

/// The first mismatching index and what surrounded it. `None` marks a stream
/// that had already ended.
#[derive(Debug, PartialEq)]
pub struct Divergence {
    pub index: usize,
    pub emulator: Option<String>,
    pub reference: Option<String>,
    pub raw: Option<String>,
    /// Raw lines of the preceding matches, oldest first.
    pub history: Vec<String>,
}

fn show(line: &Option<String>) -> &str {
    line.as_deref().unwrap_or(ABSENT)
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lines differ at index {}", self.index)?;
        writeln!(f, "Ours:")?;
        writeln!(f, "{}", show(&self.emulator))?;
        writeln!(f, "Correct:")?;
        writeln!(f, "{}", show(&self.reference))?;
        writeln!(f, "Our original line:")?;
        writeln!(f, "{}", show(&self.raw))?;
        writeln!(f)?;
        writeln!(f, "Last lines were:")?;
        for line in &self.history {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Read the `p:` column back out of a canonical line.
fn canonical_status(line: &str) -> Option<StatusFlags> {
    let start = line.find("  p: ")? + 5;
    let value = line.get(start..start + 2)?;
    u8::from_str_radix(value, 16)
        .ok()
        .map(StatusFlags::from_bits_retain)
}

/// Compare three line streams in lock-step. Read errors from any stream
/// abort the comparison.
pub fn compare<E, R, C, ReadErr>(emulator: E, raw: R, reference: C) -> Result<Outcome, ReadErr>
where
    E: IntoIterator<Item = Result<String, ReadErr>>,
    R: IntoIterator<Item = Result<String, ReadErr>>,
    C: IntoIterator<Item = Result<String, ReadErr>>,
{
    let mut emulator = emulator.into_iter().fuse();
    let mut raw = raw.into_iter().fuse();
    let mut reference = reference.into_iter().fuse();
    let mut history = HistoryBuffer::new();

    let mut index = 0;
    loop {
        let ours = emulator.next().transpose()?;
        let raw_line = raw.next().transpose()?;
        let correct = reference.next().transpose()?;

        if ours.is_none() && raw_line.is_none() && correct.is_none() {
            return Ok(Outcome::Matched { lines: index });
        }

        if ours == correct {
            if let Some(line) = raw_line {
                history.push(line);
            }
            index += 1;
            continue;
        }

        if let (Some(a), Some(b)) = (
            ours.as_deref().and_then(canonical_status),
            correct.as_deref().and_then(canonical_status),
        ) {
            debug!("status at divergence: ours {} correct {}", a.describe(), b.describe());
        }

        return Ok(Outcome::Diverged(Divergence {
            index,
            emulator: ours,
            reference: correct,
            raw: raw_line,
            history: history.into_lines(),
        }));
    }
}

fn open_lines(path: &Path) -> Result<impl Iterator<Item = Result<String, VerifyError>>, VerifyError> {
    let file = File::open(path).map_err(|e| VerifyError::io(path, e))?;
    let path = path.to_path_buf();
    Ok(BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| VerifyError::io(&path, e))))
}

/// [`compare`] over the three trace files.
pub fn compare_files(emulator: &Path, raw: &Path, reference: &Path) -> Result<Outcome, VerifyError> {
    compare(open_lines(emulator)?, open_lines(raw)?, open_lines(reference)?)
}
