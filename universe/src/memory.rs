// memory.rs - Linear memory arena that owns the universe's cell buffers
//
// Behaves like a wasm linear memory: one contiguous byte vector, bump
// allocation, and growth that may move every existing allocation.

pub const PAGE_SIZE: usize = 4096;

#[derive(Debug, Clone)]
pub struct LinearMemory {
    bytes: Vec<u8>,
    top: usize,
    relocations: u64,
}

impl Default for LinearMemory {
    fn default() -> Self {
        Self::with_pages(1)
    }
}

impl LinearMemory {
    pub fn with_pages(pages: usize) -> Self {
        Self {
            bytes: vec![0; pages * PAGE_SIZE],
            top: 0,
            relocations: 0,
        }
    }

    /// Reserves `len` zeroed bytes and returns their offset.
    ///
    /// Growing the arena reallocates the backing vector, so any pointer or
    /// slice taken before the call is invalid afterwards.
    pub fn alloc(&mut self, len: usize) -> usize {
        let offset = self.top;
        let end = offset + len;
        if end > self.bytes.len() {
            self.grow_to(end);
        }
        self.bytes[offset..end].fill(0);
        self.top = end;
        offset
    }

    /// Drops every allocation. The next `alloc` starts at offset 0 again.
    pub fn release_all(&mut self) {
        self.top = 0;
    }

    fn grow_to(&mut self, min_len: usize) {
        let pages = min_len.div_ceil(PAGE_SIZE);
        let mut grown = vec![0; pages * PAGE_SIZE];
        grown[..self.bytes.len()].copy_from_slice(&self.bytes);
        self.bytes = grown;
        self.relocations += 1;
        tracing::debug!(pages, "linear memory grown");
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    pub fn slice_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.bytes[offset..offset + len]
    }

    /// Borrows one region for reading and a disjoint one for writing.
    pub fn read_write(&mut self, src: usize, dst: usize, len: usize) -> (&[u8], &mut [u8]) {
        debug_assert!(src + len <= dst || dst + len <= src, "regions overlap");
        if src < dst {
            let (lo, hi) = self.bytes.split_at_mut(dst);
            (&lo[src..src + len], &mut hi[..len])
        } else {
            let (lo, hi) = self.bytes.split_at_mut(src);
            (&hi[..len], &mut lo[dst..dst + len])
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of times the backing storage has moved.
    pub fn relocations(&self) -> u64 {
        self.relocations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_contiguous_and_zeroed() {
        let mut memory = LinearMemory::default();
        let a = memory.alloc(10);
        memory.slice_mut(a, 10).fill(7);
        let b = memory.alloc(10);
        assert_eq!((a, b), (0, 10));
        assert!(memory.slice(b, 10).iter().all(|&byte| byte == 0));
    }

    #[test]
    fn growing_keeps_contents_and_counts_relocation() {
        let mut memory = LinearMemory::with_pages(1);
        let a = memory.alloc(16);
        memory.slice_mut(a, 16).fill(1);
        memory.alloc(PAGE_SIZE * 2);
        assert_eq!(memory.relocations(), 1);
        assert_eq!(memory.len(), PAGE_SIZE * 3);
        assert!(memory.slice(a, 16).iter().all(|&byte| byte == 1));
    }

    #[test]
    fn read_write_splits_in_either_order() {
        let mut memory = LinearMemory::default();
        let a = memory.alloc(4);
        let b = memory.alloc(4);
        memory.slice_mut(a, 4).copy_from_slice(&[1, 2, 3, 4]);

        let (src, dst) = memory.read_write(a, b, 4);
        dst.copy_from_slice(src);
        assert_eq!(memory.slice(b, 4), &[1, 2, 3, 4]);

        memory.slice_mut(b, 4).fill(9);
        let (src, dst) = memory.read_write(b, a, 4);
        dst.copy_from_slice(src);
        assert_eq!(memory.slice(a, 4), &[9, 9, 9, 9]);
    }

    #[test]
    fn release_all_reuses_offsets() {
        let mut memory = LinearMemory::default();
        memory.alloc(100);
        memory.release_all();
        assert_eq!(memory.alloc(8), 0);
    }
}
