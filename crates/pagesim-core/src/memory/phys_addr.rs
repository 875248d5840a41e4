use std::fmt::{Debug, Display, Formatter};

use serde::Serialize;

use crate::memory::FrameIndex;

#[repr(transparent)]
#[derive(Clone, Copy, Default, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
/// Physical memory address.
///
/// A byte address in the simulated memory, `frame * page_size + offset`.
pub struct PhysAddr(usize);

impl Debug for PhysAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("PhysAddr(0x{:02x})", self.0))
    }
}

impl Display for PhysAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl PhysAddr {
    /// Creates a new physical address.
    pub fn new(addr: usize) -> Self {
        PhysAddr(addr)
    }

    /// Address of byte `offset` within `frame`.
    pub fn from_frame(frame: FrameIndex, page_size: usize, offset: usize) -> Self {
        debug_assert!(offset < page_size, "offset {} >= page size {}", offset, page_size);
        PhysAddr(frame.as_usize() * page_size + offset)
    }

    /// Returns the address as a usize.
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_frame() {
        let addr = PhysAddr::from_frame(FrameIndex::new(3), 1024, 17);
        assert_eq!(addr.as_usize(), 3 * 1024 + 17);
        assert_eq!(addr.to_string(), "3089");
        assert_eq!(format!("{:?}", PhysAddr::new(255)), "PhysAddr(0xff)");
    }
}
