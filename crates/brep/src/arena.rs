//! Fixed-capacity bump allocator over caller-provided memory.
//!
//! The arena never owns or grows its backing storage. Callers size the
//! memory once (typically from the mesh size queries) and carve typed
//! output buffers out of it. Regions handed out stay valid for the whole
//! borrow of the backing memory, so several buffers can be filled side by
//! side. To reuse the memory next frame, drop the arena and create a new one
//! over the same slice.

use bytemuck::Pod;

/// Errors returned by arena-backed operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    #[error("Arena out of memory: requested {requested} bytes, {remaining} remaining")]
    OutOfMemory { requested: usize, remaining: usize },
}

/// Bump allocator over a borrowed byte slice
#[derive(Debug)]
pub struct Arena<'a> {
    /// Unallocated tail of the backing memory
    free: &'a mut [u8],
    capacity: usize,
}

/// Round `address` up to the next multiple of `alignment`.
#[inline]
fn align_forward(address: usize, alignment: usize) -> usize {
    debug_assert!(
        alignment.is_power_of_two(),
        "alignment must be a power of two, got {alignment}"
    );
    let modulo = address & (alignment - 1);
    if modulo != 0 {
        address + alignment - modulo
    } else {
        address
    }
}

impl<'a> Arena<'a> {
    /// Wrap caller-provided memory. Nothing is allocated yet.
    pub fn new(memory: &'a mut [u8]) -> Self {
        let capacity = memory.len();
        Self {
            free: memory,
            capacity,
        }
    }

    /// Total size of the backing memory in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed so far, alignment padding included
    #[inline]
    pub fn offset(&self) -> usize {
        self.capacity - self.free.len()
    }

    /// Bytes still available (before any alignment padding)
    #[inline]
    pub fn remaining(&self) -> usize {
        self.free.len()
    }

    /// Returns (padding, padding + size) for a region placed at the current offset.
    fn footprint(&self, size: usize, alignment: usize) -> Option<(usize, usize)> {
        let start = self.free.as_ptr() as usize;
        let padding = align_forward(start, alignment) - start;
        padding.checked_add(size).map(|total| (padding, total))
    }

    /// Check whether a region of `size` bytes at `alignment` would fit.
    pub fn can_allocate(&self, size: usize, alignment: usize) -> bool {
        matches!(self.footprint(size, alignment), Some((_, total)) if total <= self.free.len())
    }

    /// Check whether `(size, alignment)` regions allocated back to back in
    /// order would all fit, padding between them included.
    pub fn can_allocate_all(&self, regions: &[(usize, usize)]) -> bool {
        let start = self.free.as_ptr() as usize;
        let mut cursor = start;
        for &(size, alignment) in regions {
            let Some(end) = align_forward(cursor, alignment).checked_add(size) else {
                return false;
            };
            cursor = end;
        }
        cursor - start <= self.free.len()
    }

    /// Allocate `size` bytes aligned to `alignment`.
    ///
    /// Returns `None` and leaves the offset unchanged when the region does
    /// not fit. The region's contents are whatever the backing memory held.
    pub fn allocate_region(&mut self, size: usize, alignment: usize) -> Option<&'a mut [u8]> {
        let (padding, total) = self.footprint(size, alignment)?;
        if total > self.free.len() {
            return None;
        }

        let free = std::mem::take(&mut self.free);
        let (region, rest) = free.split_at_mut(total);
        self.free = rest;
        Some(&mut region[padding..])
    }

    /// Allocate a region and copy `data` into it.
    pub fn push_region(&mut self, data: &[u8], alignment: usize) -> Option<&'a mut [u8]> {
        let region = self.allocate_region(data.len(), alignment)?;
        region.copy_from_slice(data);
        Some(region)
    }

    /// Allocate a zero-initialized slice of `len` plain-old-data values.
    pub fn allocate_slice<T: Pod>(&mut self, len: usize) -> Option<&'a mut [T]> {
        let size = len.checked_mul(std::mem::size_of::<T>())?;
        let region = self.allocate_region(size, std::mem::align_of::<T>())?;
        region.fill(0);
        bytemuck::try_cast_slice_mut(region).ok()
    }

    /// Like [`Arena::allocate_slice`], but reports the shortfall as an error.
    pub fn try_allocate_slice<T: Pod>(&mut self, len: usize) -> Result<&'a mut [T], ArenaError> {
        let remaining = self.remaining();
        self.allocate_slice(len).ok_or(ArenaError::OutOfMemory {
            requested: len.saturating_mul(std::mem::size_of::<T>()),
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_forward() {
        assert_eq!(align_forward(0, 8), 0);
        assert_eq!(align_forward(1, 8), 8);
        assert_eq!(align_forward(8, 8), 8);
        assert_eq!(align_forward(13, 4), 16);
    }

    #[test]
    fn test_allocations_are_aligned() {
        let mut memory = [0u8; 256];
        let mut arena = Arena::new(&mut memory);

        let byte = arena.allocate_region(1, 1).unwrap();
        assert_eq!(byte.len(), 1);

        let words: &mut [u32] = arena.allocate_slice(4).unwrap();
        assert_eq!(words.len(), 4);
        assert_eq!(words.as_ptr() as usize % std::mem::align_of::<u32>(), 0);
        assert!(words.iter().all(|&w| w == 0));
    }

    #[test]
    fn test_offset_tracks_usage() {
        let mut memory = [0u8; 64];
        let mut arena = Arena::new(&mut memory);
        assert_eq!(arena.capacity(), 64);
        assert_eq!(arena.offset(), 0);

        arena.allocate_region(10, 1).unwrap();
        assert_eq!(arena.offset(), 10);
        assert_eq!(arena.remaining(), 54);
    }

    #[test]
    fn test_failed_allocation_leaves_offset_unchanged() {
        let mut memory = [0u8; 16];
        let mut arena = Arena::new(&mut memory);
        arena.allocate_region(12, 1).unwrap();

        assert!(!arena.can_allocate(8, 1));
        assert!(arena.allocate_region(8, 1).is_none());
        assert_eq!(arena.offset(), 12);

        assert!(arena.can_allocate(4, 1));
        assert!(arena.allocate_region(4, 1).is_some());
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn test_can_allocate_all_counts_padding() {
        let mut memory = [0u8; 16];
        let mut arena = Arena::new(&mut memory);
        arena.allocate_region(1, 1).unwrap();
        let at = arena.free.as_ptr() as usize;
        let padding = align_forward(at + 1, 4) - (at + 1);

        // One byte, then a 4-aligned word: 1 + padding + 4
        let needed = 1 + padding + 4;
        assert!(arena.can_allocate_all(&[(1, 1), (4, 4)]));
        assert!(arena.can_allocate_all(&[(1, 1), (4, 4), (15 - needed, 1)]));
        assert!(!arena.can_allocate_all(&[(1, 1), (4, 4), (16 - needed, 1)]));
        assert!(!arena.can_allocate_all(&[(usize::MAX, 1), (1, 1)]));
        assert_eq!(arena.offset(), 1);
    }

    #[test]
    fn test_push_region_copies_data() {
        let mut memory = [0u8; 32];
        let mut arena = Arena::new(&mut memory);
        let region = arena.push_region(&[1, 2, 3, 4], 4).unwrap();
        assert_eq!(&region[..], &[1u8, 2, 3, 4][..]);
    }

    #[test]
    fn test_regions_coexist() {
        let mut memory = [0u8; 64];
        let mut arena = Arena::new(&mut memory);
        let a: &mut [u32] = arena.allocate_slice(2).unwrap();
        let b: &mut [u32] = arena.allocate_slice(2).unwrap();
        a[0] = 7;
        b[0] = 9;
        assert_eq!(a[0], 7);
        assert_eq!(b[0], 9);
    }

    #[test]
    fn test_try_allocate_slice_reports_shortfall() {
        let mut memory = [0u8; 8];
        let mut arena = Arena::new(&mut memory);
        let err = arena.try_allocate_slice::<u32>(4).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfMemory {
                requested: 16,
                remaining: 8
            }
        );
    }
}
