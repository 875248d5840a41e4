use std::ops::Range;

use log::{log, trace};
use serde::Serialize;

use crate::memory::FrameIndex;

/// Runs of physically consecutive frames, in logical page order.
pub type FrameRuns = Vec<Range<FrameIndex>>;

/// Per-job mapping from logical page index to frame index.
///
/// Entry `i` is the frame backing logical page `i`. The table is built once
/// when the job is created and never changes afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageTable {
    entries: Vec<FrameIndex>,
}

impl PageTable {
    /// Builds a page table from frames in logical page order.
    pub fn from_frames(frames: Vec<FrameIndex>) -> Self {
        PageTable { entries: frames }
    }

    /// Frame backing logical page `page`.
    pub fn frame(&self, page: usize) -> Option<FrameIndex> {
        self.entries.get(page).copied()
    }

    /// Number of pages mapped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no page is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All backing frames in logical page order.
    pub fn frames(&self) -> &[FrameIndex] {
        &self.entries
    }

    /// Iterates over `(page, frame)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, FrameIndex)> + '_ {
        self.entries.iter().copied().enumerate()
    }

    /// Splits the table into maximal runs of consecutive frames.
    ///
    /// Two neighbouring pages belong to the same run if the frame of the second
    /// directly follows the frame of the first.
    pub fn frame_runs(&self) -> FrameRuns {
        let mut runs = vec![];
        let Some(&first) = self.entries.first() else {
            return runs;
        };
        let mut prev = first;
        let mut run_start = first;
        for &frame in self.entries.iter().skip(1) {
            if frame != prev.next() {
                runs.push(run_start..prev.next());
                run_start = frame;
            }
            prev = frame;
        }
        runs.push(run_start..prev.next());
        trace!("{} pages in {} frame runs", self.entries.len(), runs.len());
        runs
    }

    /// Logs the frame runs at the specified log level.
    pub fn log_runs(&self, level: log::Level) {
        log!(level, "Frame runs:\n{}", self.frame_runs().format_runs());
    }
}

/// Formats frame runs for display.
pub trait FormatFrameRuns {
    /// Formats frame runs as a human-readable string, one run per line.
    fn format_runs(&self) -> String;
}

impl FormatFrameRuns for FrameRuns {
    fn format_runs(&self) -> String {
        let mut runs = String::new();
        for run in self {
            let len = run.end.as_usize() - run.start.as_usize();
            runs += &format!("{:04}..[{:03} frames]..{:04}\n", run.start, len, run.end);
        }
        runs
    }
}
