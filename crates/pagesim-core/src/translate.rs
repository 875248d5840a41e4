//! Logical to physical address translation.
//!
//! Translation is a pure function of a job's page table: the logical address is
//! split into a page number and an offset, the page number is looked up in the
//! page table, and the physical address is `frame * page_size + offset`.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::job::{JobId, JobRegistry};
use crate::memory::{FrameIndex, PhysAddr};

/// Result of a successful address translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Translation {
    /// Job the address belongs to
    pub job: JobId,
    /// Logical address within the job
    pub logical_address: usize,
    /// Logical page number, `logical_address / page_size`
    pub page: usize,
    /// Offset within the page, `logical_address % page_size`
    pub offset: usize,
    /// Frame backing the page
    pub frame: FrameIndex,
    /// Physical address, `frame * page_size + offset`
    pub physical: PhysAddr,
}

/// Trait for resolving a job's logical addresses to physical addresses.
pub trait AddressTranslator {
    /// Translates `logical_address` of `job`.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownJobId`] if `job` is not live. Checked first.
    /// * [`Error::AddressOutOfBounds`] if the address is negative or not below the
    ///   job's requested size. Addresses inside the padding of the last page are
    ///   rejected even though a frame backs them.
    fn translate(&self, job: JobId, logical_address: i64) -> Result<Translation>;
}

impl AddressTranslator for JobRegistry {
    fn translate(&self, job: JobId, logical_address: i64) -> Result<Translation> {
        translate(self, job, logical_address)
    }
}

/// Translates `logical_address` of `job` using the page tables of `registry`.
///
/// See [`AddressTranslator::translate`].
pub fn translate(registry: &JobRegistry, job: JobId, logical_address: i64) -> Result<Translation> {
    let record = registry.lookup(job)?;
    let size = record.requested_size();
    let out_of_bounds = Error::AddressOutOfBounds {
        job,
        address: logical_address,
        size,
    };
    let Ok(address) = usize::try_from(logical_address) else {
        return Err(out_of_bounds);
    };
    if address >= size {
        return Err(out_of_bounds);
    }
    let page_size = registry.config().page_size();
    let page = address / page_size;
    let offset = address % page_size;
    let frame = record
        .page_table()
        .frame(page)
        .expect("page table covers every page below the requested size");
    Ok(Translation {
        job,
        logical_address: address,
        page,
        offset,
        frame,
        physical: PhysAddr::from_frame(frame, page_size, offset),
    })
}
