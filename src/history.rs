use crossbeam::queue::ArrayQueue;

/// Number of matching raw lines kept for the divergence report.
pub const HISTORY_CAPACITY: usize = 10;

/// The most recent raw emulator lines, oldest first. Once full, each push
/// evicts the oldest entry.
pub struct HistoryBuffer {
    lines: ArrayQueue<String>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        HistoryBuffer {
            lines: ArrayQueue::new(capacity),
        }
    }

    pub fn push(&mut self, line: String) {
        self.lines.force_push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drain into chronological order.
    pub fn into_lines(self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.lines.len());
        while let Some(line) = self.lines.pop() {
            out.push(line);
        }
        out
    }
}
