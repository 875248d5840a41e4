use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::job::{Job, JobId, JobRegistry};
use crate::memory::{FrameIndex, FrameState, PageTable};

/// Occupancy of one frame as seen by a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FrameDescriptor {
    /// No job page lives in the frame
    Free {
        /// Frame index
        frame: FrameIndex,
    },
    /// A job page lives in the frame
    Owned {
        /// Frame index
        frame: FrameIndex,
        /// Owning job
        job: JobId,
        /// Name of the owning job
        name: String,
        /// Logical page of the job
        page: usize,
    },
}

impl FrameDescriptor {
    /// Index of the described frame.
    pub fn frame(&self) -> FrameIndex {
        match self {
            FrameDescriptor::Free { frame } | FrameDescriptor::Owned { frame, .. } => *frame,
        }
    }

    /// Returns `true` if the frame is free.
    pub fn is_free(&self) -> bool {
        matches!(self, FrameDescriptor::Free { .. })
    }
}

/// Summary of a live job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    /// Job identifier
    pub id: JobId,
    /// Job label
    pub name: String,
    /// Requested size in bytes
    pub size: usize,
    /// Number of pages
    pub pages: usize,
    /// Unused bytes in the last page
    pub internal_fragmentation: usize,
    /// Page to frame mapping
    pub page_table: PageTable,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        JobSummary {
            id: job.id(),
            name: job.name().to_string(),
            size: job.requested_size(),
            pages: job.page_count(),
            internal_fragmentation: job.internal_fragmentation(),
            page_table: job.page_table().clone(),
        }
    }
}

/// Point-in-time view of the simulated memory.
///
/// Captured from a [`JobRegistry`] without mutating it. The `Display`
/// implementation renders the frame table, the page tables and the job list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    /// Bytes per frame
    pub page_size: usize,
    /// Frames in the pool
    pub total_frames: usize,
    /// Frames owned by a job page
    pub used_frames: usize,
    /// One descriptor per frame, in frame order
    pub frames: Vec<FrameDescriptor>,
    /// Live jobs in id order
    pub jobs: Vec<JobSummary>,
}

impl MemorySnapshot {
    /// Captures the current state of `registry`.
    pub fn capture(registry: &JobRegistry) -> Self {
        let allocator = registry.allocator();
        let frames = allocator
            .frames()
            .iter()
            .enumerate()
            .map(|(idx, state)| {
                let frame = FrameIndex::new(idx);
                match state {
                    FrameState::Free => FrameDescriptor::Free { frame },
                    FrameState::Owned(owner) => FrameDescriptor::Owned {
                        frame,
                        job: owner.job,
                        name: registry
                            .lookup(owner.job)
                            .map(|job| job.name().to_string())
                            .unwrap_or_default(),
                        page: owner.page,
                    },
                }
            })
            .collect_vec();
        MemorySnapshot {
            page_size: registry.config().page_size(),
            total_frames: allocator.total_count(),
            used_frames: allocator.used_count(),
            frames,
            jobs: registry.jobs().map(JobSummary::from).collect(),
        }
    }

    /// Frames not owned by any job.
    pub fn free_frames(&self) -> usize {
        self.total_frames - self.used_frames
    }

    /// Sum of internal fragmentation over all live jobs.
    pub fn total_internal_fragmentation(&self) -> usize {
        self.jobs.iter().map(|job| job.internal_fragmentation).sum()
    }
}

impl fmt::Display for MemorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Memory State ===")?;
        writeln!(f, "Page Size: {} bytes", self.page_size)?;
        writeln!(f, "Total Frames: {}", self.total_frames)?;
        writeln!(f, "Used Frames: {} / {}", self.used_frames, self.total_frames)?;
        writeln!(
            f,
            "Internal Fragmentation: {} bytes",
            self.total_internal_fragmentation()
        )?;

        writeln!(f)?;
        writeln!(f, "Frame Allocation:")?;
        writeln!(
            f,
            "{:>8}{:>10}{:>15}{:>8}{:>8}",
            "Frame", "Job ID", "Job Name", "Page #", "Status"
        )?;
        writeln!(f, "{}", "-".repeat(49))?;
        for descriptor in &self.frames {
            match descriptor {
                FrameDescriptor::Free { frame } => {
                    writeln!(f, "{:>8}{:>10}{:>15}{:>8}{:>8}", frame, "-", "-", "-", "Free")?
                }
                FrameDescriptor::Owned {
                    frame,
                    job,
                    name,
                    page,
                } => writeln!(f, "{:>8}{:>10}{:>15}{:>8}{:>8}", frame, job, name, page, "Used")?,
            }
        }

        writeln!(f)?;
        writeln!(f, "Page Table:")?;
        writeln!(f, "{:>8}{:>10}{:>12}", "Job ID", "Page #", "Frame #")?;
        writeln!(f, "{}", "-".repeat(30))?;
        for job in &self.jobs {
            for (page, frame) in job.page_table.iter() {
                writeln!(f, "{:>8}{:>10}{:>12}", job.id, page, frame)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Jobs:")?;
        writeln!(
            f,
            "{:>8}{:>15}{:>10}{:>8}{:>15}",
            "Job ID", "Job Name", "Size", "Pages", "Fragmentation"
        )?;
        writeln!(f, "{}", "-".repeat(56))?;
        for job in &self.jobs {
            writeln!(
                f,
                "{:>8}{:>15}{:>10}{:>8}{:>15}",
                job.id, job.name, job.size, job.pages, job.internal_fragmentation
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PagerConfig;
    use crate::selector::LowestFirst;

    fn registry() -> JobRegistry {
        let config = PagerConfig::new(1024, 4).expect("valid config");
        JobRegistry::with_selector(config, Box::new(LowestFirst))
    }

    #[test]
    fn test_capture_empty() {
        let snapshot = MemorySnapshot::capture(&registry());
        assert_eq!(snapshot.frames.len(), 4);
        assert!(snapshot.frames.iter().all(FrameDescriptor::is_free));
        assert_eq!(snapshot.used_frames, 0);
        assert_eq!(snapshot.free_frames(), 4);
        assert!(snapshot.jobs.is_empty());
    }

    #[test]
    fn test_capture_owned_frames() {
        let mut reg = registry();
        reg.create_job("Job1", 1024).expect("fits");
        let job2 = reg.create_job("Job2", 1500).expect("fits");
        let snapshot = MemorySnapshot::capture(&reg);
        assert_eq!(snapshot.used_frames, 3);
        assert_eq!(
            snapshot.frames[2],
            FrameDescriptor::Owned {
                frame: FrameIndex::new(2),
                job: job2,
                name: "Job2".to_string(),
                page: 1
            }
        );
        assert_eq!(snapshot.frames[3].frame(), FrameIndex::new(3));
        assert!(snapshot.frames[3].is_free());
        assert_eq!(snapshot.jobs.len(), 2);
        assert_eq!(snapshot.total_internal_fragmentation(), 548);
    }

    #[test]
    fn test_render() {
        let mut reg = registry();
        reg.create_job("Job1", 2048).expect("fits");
        let text = MemorySnapshot::capture(&reg).to_string();
        assert!(text.contains("Used Frames: 2 / 4"));
        assert!(text.contains("       0         1           Job1       0    Used"));
        assert!(text.contains("       3         -              -       -    Free"));
        assert!(text.contains("       1         1           1"));
    }

    #[test]
    fn test_serialize() -> anyhow::Result<()> {
        let mut reg = registry();
        reg.create_job("Job1", 100).expect("fits");
        let json = serde_json::to_value(MemorySnapshot::capture(&reg))?;
        assert_eq!(json["used_frames"], 1);
        assert_eq!(json["frames"][0]["state"], "owned");
        assert_eq!(json["frames"][0]["name"], "Job1");
        assert_eq!(json["frames"][1]["state"], "free");
        assert_eq!(json["jobs"][0]["page_table"], serde_json::json!([0]));
        assert_eq!(json["jobs"][0]["internal_fragmentation"], 924);
        Ok(())
    }
}
